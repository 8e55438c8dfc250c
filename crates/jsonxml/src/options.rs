use alloc::string::String;

/// Configuration of the JSON to XML mapping.
///
/// Options are fixed for the lifetime of a transcode; nothing here changes
/// while a document is being converted.
///
/// # Examples
///
/// ```rust
/// use jsonxml::{TranscodeOptions, Transcoder};
///
/// let transcoder = Transcoder::new(TranscodeOptions {
///     wrap_arrays: true,
///     add_type_attributes: true,
///     artificial_root: Some("root".into()),
///     ..Default::default()
/// });
/// ```
///
/// # Default
///
/// No namespace, no type attributes, arrays flattened, no artificial root and
/// a nesting limit of 128.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
#[cfg_attr(any(test, feature = "serde"), serde(default))]
pub struct TranscodeOptions {
    /// Namespace URI of every emitted element.
    ///
    /// An empty string is the same as `None`.
    ///
    /// # Default
    ///
    /// `None`
    pub namespace_uri: Option<String>,

    /// Whether elements carry an advisory `type` attribute (`int`, `float`,
    /// `boolean`, `string`, `null` or `array`).
    ///
    /// The value reflects how the token source classified the value, so
    /// `1.0` is a `float` even though it is integral. Elements for objects get
    /// no attribute.
    ///
    /// # Default
    ///
    /// `false`
    pub add_type_attributes: bool,

    /// Whether an array-valued field is wrapped in an element named after the
    /// field, in addition to one element per item.
    ///
    /// # Examples
    ///
    /// `{"tags": ["a", "b"]}` becomes
    ///
    /// ```xml
    /// <!-- false -->
    /// <tags>a</tags><tags>b</tags>
    /// <!-- true -->
    /// <tags><tags>a</tags><tags>b</tags></tags>
    /// ```
    ///
    /// # Default
    ///
    /// `false`
    pub wrap_arrays: bool,

    /// Name of an element wrapping the whole document.
    ///
    /// XML requires exactly one document element. Without an artificial
    /// root, JSON whose top level maps to several elements fails with
    /// [`ErrorKind::MultipleRoots`](crate::ErrorKind::MultipleRoots). An
    /// empty string is the same as `None`.
    ///
    /// # Default
    ///
    /// `None`
    pub artificial_root: Option<String>,

    /// Maximum nesting depth of JSON objects and arrays.
    ///
    /// Deeper input fails with
    /// [`ErrorKind::DepthLimitExceeded`](crate::ErrorKind::DepthLimitExceeded)
    /// instead of exhausting the stack.
    ///
    /// # Default
    ///
    /// `128`
    pub max_depth: usize,
}

impl Default for TranscodeOptions {
    fn default() -> Self {
        Self {
            namespace_uri: None,
            add_type_attributes: false,
            wrap_arrays: false,
            artificial_root: None,
            max_depth: 128,
        }
    }
}

impl TranscodeOptions {
    /// The namespace URI, if set and non-empty.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        non_empty(self.namespace_uri.as_deref())
    }

    /// The artificial root name, if set and non-empty.
    #[must_use]
    pub fn root(&self) -> Option<&str> {
        non_empty(self.artificial_root.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
