use serde::{Deserialize, Serialize};

/// Metadata submitted alongside a model upload on `POST /print-request`.
///
/// Every field is free text. Fields missing from the form fall back to the
/// defaults of [`PrintRequest::default`]; a field that is present but empty
/// stays empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintRequest {
    /// Print density in percent. Not validated, forwarded as typed.
    pub infill: String,
    /// Contact name of the requester.
    pub name: String,
    /// Contact value, e.g. an email address or phone number.
    pub contact_str: String,
    /// What kind of contact `contact_str` is, e.g. `email` or `phone`.
    pub contact_type: String,
    pub notes: String,
}

impl Default for PrintRequest {
    fn default() -> Self {
        Self {
            infill: "unknown".to_string(),
            name: "N/A".to_string(),
            contact_str: "N/A".to_string(),
            contact_type: String::new(),
            notes: String::new(),
        }
    }
}

impl PrintRequest {
    /// Multipart field names that carry request metadata.
    pub const FIELDS: [&'static str; 5] = ["infill", "name", "contact_str", "contact_type", "notes"];

    /// Builds a request from `(field, value)` pairs in the order they were received.
    ///
    /// The first occurrence of a field wins and unknown fields are ignored.
    pub fn from_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut seen = [false; 5];
        let mut request = Self::default();

        for (key, value) in fields {
            let Some(idx) = Self::FIELDS.iter().position(|f| *f == key.as_ref()) else {
                continue;
            };
            if seen[idx] {
                continue;
            }
            seen[idx] = true;

            let slot = match idx {
                0 => &mut request.infill,
                1 => &mut request.name,
                2 => &mut request.contact_str,
                3 => &mut request.contact_type,
                _ => &mut request.notes,
            };
            *slot = value.into();
        }

        request
    }

    /// The note attached to the draft order so staff can follow up.
    pub fn order_note(&self) -> String {
        format!(
            "Contact name: {}\n{}: {}\nInfill: {}%\n\n{}",
            self.name, self.contact_type, self.contact_str, self.infill, self.notes
        )
    }
}
