//! Endpoint descriptors and argument validation.
//!
//! Every endpoint declares its arguments up front. Arguments travel as one
//! `body` query parameter holding a compact JSON object.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;
use thorns_core::Error;

/// One declared argument of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgumentSpec {
    pub name: &'static str,
    pub required: bool,
}

impl ArgumentSpec {
    const fn required(name: &'static str) -> Self {
        Self { name, required: true }
    }

    const fn optional(name: &'static str) -> Self {
        Self { name, required: false }
    }
}

/// Name and argument list of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointDescriptor {
    pub name: &'static str,
    pub arguments: &'static [ArgumentSpec],
}

const NONE: &[ArgumentSpec] = &[];
const NAME_OPTIONAL: &[ArgumentSpec] = &[ArgumentSpec::optional("name")];
const NAME_REQUIRED: &[ArgumentSpec] = &[ArgumentSpec::required("name")];
const SEARCH: &[ArgumentSpec] = &[ArgumentSpec::required("term"), ArgumentSpec::required("type")];

/// The remote endpoints this client calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    AllNews,
    SingleImage,
    ImageDescription,
    AllImages,
    FullEpisodic,
    SingleRecord,
    RecordText,
    DomainSearch,
}

impl Endpoint {
    pub const ALL: [Endpoint; 8] = [
        Endpoint::AllNews,
        Endpoint::SingleImage,
        Endpoint::ImageDescription,
        Endpoint::AllImages,
        Endpoint::FullEpisodic,
        Endpoint::SingleRecord,
        Endpoint::RecordText,
        Endpoint::DomainSearch,
    ];

    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    pub fn descriptor(self) -> EndpointDescriptor {
        let (name, arguments) = match self {
            Endpoint::AllNews => ("all_news", NONE),
            Endpoint::SingleImage => ("single_image", NAME_OPTIONAL),
            Endpoint::ImageDescription => ("image_description", NAME_REQUIRED),
            Endpoint::AllImages => ("all_images", NONE),
            Endpoint::FullEpisodic => ("full_episodic", NONE),
            Endpoint::SingleRecord => ("single_record", NAME_REQUIRED),
            Endpoint::RecordText => ("record_text", NAME_REQUIRED),
            Endpoint::DomainSearch => ("domain_search", SEARCH),
        };
        EndpointDescriptor { name, arguments }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Arguments of one call, sorted by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments(BTreeMap<String, Value>);

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Add `name` only when `value` is present.
    pub fn with_opt(self, name: impl Into<String>, value: Option<impl Into<Value>>) -> Self {
        match value {
            Some(value) => self.with(name, value),
            None => self,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_json(&self) -> String {
        Value::Object(self.0.clone().into_iter().collect()).to_string()
    }
}

/// A GET request ready for a [`crate::Transport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
}

impl HttpRequest {
    /// Plain GET of an absolute URL, used for image payloads.
    pub fn get(url: impl Into<String>) -> Self {
        Self { url: url.into(), query: Vec::new() }
    }
}

impl fmt::Display for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)?;
        for (i, (name, value)) in self.query.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{sep}{name}={value}")?;
        }
        Ok(())
    }
}

impl EndpointDescriptor {
    /// Check `args` against the declared arguments.
    ///
    /// With `strict`, undeclared arguments are rejected as well.
    pub fn validate(&self, args: &Arguments, strict: bool) -> Result<(), Error> {
        if strict {
            if let Some(extra) = args.names().find(|name| !self.arguments.iter().any(|spec| spec.name == *name)) {
                return Err(Error::UnexpectedArgument { endpoint: self.name.to_string(), argument: extra.to_string() });
            }
        }
        if let Some(missing) = self.arguments.iter().find(|spec| spec.required && !args.contains(spec.name)) {
            return Err(Error::MissingArgument { endpoint: self.name.to_string(), argument: missing.name.to_string() });
        }
        Ok(())
    }

    /// Validate `args` and build the request against `api_root`.
    pub fn request(&self, api_root: &str, args: &Arguments, strict: bool) -> Result<HttpRequest, Error> {
        self.validate(args, strict)?;
        Ok(HttpRequest { url: format!("{api_root}{}", self.name), query: vec![("body".to_string(), args.to_json())] })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT: &str = "https://fractalthorns.com/api/v1/";

    #[test]
    fn test_request_without_arguments_sends_empty_body() {
        let req = Endpoint::AllNews.descriptor().request(ROOT, &Arguments::new(), true).unwrap();
        assert_eq!(req.url, "https://fractalthorns.com/api/v1/all_news");
        assert_eq!(req.query, vec![("body".to_string(), "{}".to_string())]);
        assert_eq!(req.to_string(), "https://fractalthorns.com/api/v1/all_news?body={}");
    }

    #[test]
    fn test_body_is_sorted_compact_json() {
        let args = Arguments::new().with("type", "image").with("term", "eyes");
        let req = Endpoint::DomainSearch.descriptor().request(ROOT, &args, true).unwrap();
        assert_eq!(req.query[0].1, r#"{"term":"eyes","type":"image"}"#);
    }

    #[test]
    fn test_missing_required_argument() {
        let err = Endpoint::RecordText.descriptor().validate(&Arguments::new(), true).unwrap_err();
        assert!(matches!(err, Error::MissingArgument { ref endpoint, ref argument }
            if endpoint == "record_text" && argument == "name"));
    }

    #[test]
    fn test_optional_argument_may_be_absent() {
        assert!(Endpoint::SingleImage.descriptor().validate(&Arguments::new(), true).is_ok());
        let args = Arguments::new().with_opt("name", None::<&str>);
        assert!(args.is_empty());
    }

    #[test]
    fn test_unexpected_argument_only_when_strict() {
        let args = Arguments::new().with("name", "r1").with("page", 2);
        let descriptor = Endpoint::SingleRecord.descriptor();
        assert!(matches!(
            descriptor.validate(&args, true),
            Err(Error::UnexpectedArgument { ref argument, .. }) if argument == "page"
        ));
        assert!(descriptor.validate(&args, false).is_ok());
    }

    #[test]
    fn test_endpoint_names() {
        let names: Vec<&str> = Endpoint::ALL.iter().map(|e| e.name()).collect();
        assert_eq!(
            names,
            vec![
                "all_news",
                "single_image",
                "image_description",
                "all_images",
                "full_episodic",
                "single_record",
                "record_text",
                "domain_search"
            ]
        );
    }
}
