//! Enumerated columns with human labels
//!
//! Locations, positions and campaigns are stored as their display labels.
//! Values read from disk that match no label are kept verbatim in an `Other`
//! variant instead of failing the load; entry forms use `parse_known` to
//! reject them.

/// Define an enum whose variants map one-to-one onto stored labels.
///
/// Generates `LABELS`, `from_label`, `from_cell`, `parse_known`, `as_str`,
/// plus `Display` and a string `Serialize`.
macro_rules! labeled_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// Stored text that matches no known label
            Other(String),
        }

        impl $name {
            /// Every known label, in form order
            pub const LABELS: &'static [&'static str] = &[ $( $label ),+ ];

            /// Lenient decoding used at load time. Matching ignores case and
            /// surrounding whitespace.
            pub fn from_label(text: &str) -> Self {
                let trimmed = text.trim();
                let lowered = trimmed.to_lowercase();
                $(
                    if lowered == $label.to_lowercase() {
                        return $name::$variant;
                    }
                )+
                $name::Other(trimmed.to_string())
            }

            /// Like `from_label`, but a blank cell is `None`.
            pub fn from_cell(text: &str) -> Option<Self> {
                if text.trim().is_empty() {
                    None
                } else {
                    Some(Self::from_label(text))
                }
            }

            /// Strict decoding used by entry forms.
            pub fn parse_known(
                field: &'static str,
                text: &str,
            ) -> Result<Self, $crate::error::ValidationError> {
                match Self::from_label(text) {
                    $name::Other(value) => {
                        Err($crate::error::ValidationError::UnknownOption { field, value })
                    }
                    known => Ok(known),
                }
            }

            pub fn as_str(&self) -> &str {
                match self {
                    $( $name::$variant => $label, )+
                    $name::Other(text) => text,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }
    };
}

pub(crate) use labeled_enum;
