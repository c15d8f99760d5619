use clap::ValueEnum;

use crate::error::{Error, Result};

/// Format a command prints its results in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Default,
    /// A single pretty-printed JSON document.
    Json,
    /// Not implemented yet; always fails.
    Xml,
}

/// Implemented by the results of any command that supports `--output-format`.
/// Rendering happens after all data has been fetched and must not do I/O.
pub trait FormattedOutput {
    fn default_output(&self) -> Result<String>;

    fn json_output(&self) -> Result<String>;

    fn xml_output(&self) -> Result<String> {
        Err(Error::Unsupported("XML"))
    }
}

impl OutputFormat {
    pub fn render<T: FormattedOutput + ?Sized>(self, data: &T) -> Result<String> {
        match self {
            OutputFormat::Default => data.default_output(),
            OutputFormat::Json => data.json_output(),
            OutputFormat::Xml => data.xml_output(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Greeting;

    impl FormattedOutput for Greeting {
        fn default_output(&self) -> Result<String> {
            Ok("hello".to_owned())
        }

        fn json_output(&self) -> Result<String> {
            Ok(serde_json::to_string(&serde_json::json!({ "greeting": "hello" }))?)
        }
    }

    #[test]
    fn dispatches_to_the_selected_format() {
        assert_eq!(OutputFormat::Default.render(&Greeting).unwrap(), "hello");
        assert_eq!(
            OutputFormat::Json.render(&Greeting).unwrap(),
            r#"{"greeting":"hello"}"#
        );
    }

    #[test]
    fn xml_is_unsupported_by_default() {
        let err = OutputFormat::Xml.render(&Greeting).unwrap_err();
        assert!(matches!(err, Error::Unsupported("XML")));
    }

    #[test]
    fn default_format_is_text() {
        assert_eq!(OutputFormat::default(), OutputFormat::Default);
    }
}
