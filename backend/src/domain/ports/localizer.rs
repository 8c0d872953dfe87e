//! Port for turning message keys into user-facing text.

/// Resolves message keys, substituting positional `{0}`, `{1}`, ...
/// placeholders with `args`.
///
/// Unknown keys resolve to the key itself so callers always get some text.
pub trait Localizer: Send + Sync {
    fn localize(&self, key: &str, args: &[String]) -> String;

    /// Shorthand for a key without arguments.
    fn text(&self, key: &str) -> String {
        self.localize(key, &[])
    }
}

/// Substitute `{n}` placeholders in `template`.
///
/// # Examples
/// ```
/// use eform_base::domain::ports::format_positional;
///
/// let text = format_positional("Device user {0} created", &["Ada".to_owned()]);
/// assert_eq!(text, "Device user Ada created");
/// ```
pub fn format_positional(template: &str, args: &[String]) -> String {
    args.iter()
        .enumerate()
        .fold(template.to_owned(), |text, (index, arg)| {
            text.replace(&format!("{{{index}}}"), arg)
        })
}

/// Localizer that echoes keys, appending arguments in parentheses.
///
/// Keeps assertions in service tests independent of the resource table.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLocalizer;

impl Localizer for FixtureLocalizer {
    fn localize(&self, key: &str, args: &[String]) -> String {
        if args.is_empty() {
            key.to_owned()
        } else {
            format!("{key}({})", args.join(", "))
        }
    }
}
