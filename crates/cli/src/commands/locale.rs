//! Locale resolution diagnostics.

use shopfront_core::Locale;

/// Print the locale the storefront resolves for `target`.
///
/// `target` may be a bare path or an absolute URL.
pub fn resolve(target: &str) {
    let locale = Locale::from_url(target);

    #[allow(clippy::print_stdout)]
    {
        println!("locale:   {locale}");
        println!("language: {}", locale.language.as_str());
        println!("country:  {}", locale.country.as_str());
        println!("prefix:   {}", locale.path_prefix());
    }
}
