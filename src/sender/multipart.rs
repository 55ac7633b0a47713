use reqwest::multipart;

use crate::errors::AppResult;

/// Helper struct to hold upload payload data. Parts are emitted in the order
/// they were added: text fields first, then files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadPayload {
    text_fields: Vec<(String, String)>,
    files: Vec<FilePart>,
}

#[derive(Clone, PartialEq, Eq)]
pub struct FilePart {
    pub field_name: String,
    pub filename: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl std::fmt::Debug for FilePart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilePart")
            .field("field_name", &self.field_name)
            .field("filename", &self.filename)
            .field("mime_type", &self.mime_type)
            .field("len", &self.data.len())
            .finish()
    }
}

impl UploadPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_text_field(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.text_fields.push((key.into(), value.into()));
    }

    pub fn add_file(
        &mut self,
        field_name: impl Into<String>,
        filename: impl Into<String>,
        mime_type: impl Into<String>,
        data: Vec<u8>,
    ) {
        self.files.push(FilePart {
            field_name: field_name.into(),
            filename: filename.into(),
            mime_type: mime_type.into(),
            data,
        });
    }

    pub fn text_fields(&self) -> &[(String, String)] {
        &self.text_fields
    }

    pub fn text_field(&self, key: &str) -> Option<&str> {
        self.text_fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn files(&self) -> &[FilePart] {
        &self.files
    }

    pub fn file(&self, field_name: &str) -> Option<&FilePart> {
        self.files.iter().find(|f| f.field_name == field_name)
    }

    /// Payload size in bytes, not counting multipart framing.
    pub fn len(&self) -> usize {
        let text: usize = self.text_fields.iter().map(|(k, v)| k.len() + v.len()).sum();
        let files: usize = self.files.iter().map(|f| f.data.len()).sum();
        text + files
    }

    pub fn is_empty(&self) -> bool {
        self.text_fields.is_empty() && self.files.is_empty()
    }

    /// Build a reqwest form. Each form gets its own random boundary, and
    /// filenames are written as given, without percent-encoding.
    pub fn build_form(&self) -> AppResult<multipart::Form> {
        let mut form = multipart::Form::new().percent_encode_noop();

        for (key, value) in &self.text_fields {
            form = form.text(key.clone(), value.clone());
        }

        for file in &self.files {
            let part = multipart::Part::bytes(file.data.clone())
                .file_name(file.filename.clone())
                .mime_str(&file.mime_type)?;

            form = form.part(file.field_name.clone(), part);
        }

        Ok(form)
    }
}
