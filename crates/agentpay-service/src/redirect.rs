//! Redirect URLs handed to hosted provider pages.

use url::Url;

/// Origin the user started from; hosted pages send the user back here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectBase(Url);

impl RedirectBase {
    /// Use the request's `Origin` header when it is an absolute http(s)
    /// URL, otherwise `fallback`.
    #[must_use]
    pub fn from_origin(origin: Option<&str>, fallback: &Url) -> Self {
        let parsed = origin
            .and_then(|o| Url::parse(o.trim()).ok())
            .filter(|u| matches!(u.scheme(), "http" | "https") && u.has_host());

        Self(parsed.unwrap_or_else(|| fallback.clone()))
    }

    /// Where Checkout sends the user after paying.
    #[must_use]
    pub fn checkout_success(&self) -> String {
        self.build("/dashboard", Some("success=true"))
    }

    /// Where Checkout sends the user after abandoning the page.
    #[must_use]
    pub fn checkout_cancel(&self) -> String {
        self.build("/planos", Some("canceled=true"))
    }

    /// Where the billing portal sends the user back to.
    #[must_use]
    pub fn portal_return(&self) -> String {
        self.build("/dashboard", None)
    }

    fn build(&self, path: &str, query: Option<&str>) -> String {
        let mut url = self.0.clone();
        url.set_path(path);
        url.set_query(query);
        url.set_fragment(None);
        url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fallback() -> Url {
        Url::parse("https://site.example").unwrap()
    }

    #[test]
    fn origin_header_wins() {
        let base = RedirectBase::from_origin(Some("https://app.example"), &fallback());
        assert_eq!(
            base.checkout_success(),
            "https://app.example/dashboard?success=true"
        );
        assert_eq!(
            base.checkout_cancel(),
            "https://app.example/planos?canceled=true"
        );
        assert_eq!(base.portal_return(), "https://app.example/dashboard");
    }

    #[test]
    fn missing_or_bogus_origin_falls_back() {
        for origin in [None, Some("null"), Some("not a url"), Some("file:///etc")] {
            let base = RedirectBase::from_origin(origin, &fallback());
            assert_eq!(
                base.checkout_success(),
                "https://site.example/dashboard?success=true"
            );
        }
    }

    #[test]
    fn success_and_cancel_carry_exactly_one_marker() {
        let base = RedirectBase::from_origin(Some("http://localhost:5173"), &fallback());
        let success = Url::parse(&base.checkout_success()).unwrap();
        let cancel = Url::parse(&base.checkout_cancel()).unwrap();

        let success_pairs: Vec<_> = success.query_pairs().collect();
        let cancel_pairs: Vec<_> = cancel.query_pairs().collect();
        assert_eq!(success_pairs.len(), 1);
        assert_eq!(success_pairs[0].0, "success");
        assert_eq!(cancel_pairs.len(), 1);
        assert_eq!(cancel_pairs[0].0, "canceled");
    }
}
