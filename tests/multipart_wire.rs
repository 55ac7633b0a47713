mod support;

use qqbot_media_sender::sender::{AccessToken, MediaFile, MediaUploader, MediaVariant};

/// What multer recovered for one form field.
#[derive(Debug)]
struct ParsedField {
    name: Option<String>,
    file_name: Option<String>,
    content_type: Option<String>,
    data: Vec<u8>,
}

async fn parse_form(content_type: &str, body: Vec<u8>) -> Vec<ParsedField> {
    let boundary = multer::parse_boundary(content_type).expect("multipart boundary");
    let mut multipart = multer::Multipart::with_reader(std::io::Cursor::new(body), boundary);

    let mut fields = Vec::new();
    while let Some(field) = multipart.next_field().await.expect("well-formed field") {
        let name = field.name().map(str::to_string);
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(|mime| mime.to_string());
        let data = field.bytes().await.expect("field bytes").to_vec();
        fields.push(ParsedField {
            name,
            file_name,
            content_type,
            data,
        });
    }
    fields
}

/// Upload `file` through the real transport and return the parsed form.
async fn upload_over_the_wire(file: &MediaFile, variant: MediaVariant) -> Vec<ParsedField> {
    let (base, server) = support::serve_once(200, r#"{"file_info":"FI-WIRE"}"#).await;
    let transport = support::loopback_transport();
    let uploader = MediaUploader::new(&transport, base, "1024");

    let info = uploader
        .upload(&AccessToken::new("tok-wire"), file, variant)
        .await
        .expect("upload should succeed");
    assert_eq!(info.as_str(), "FI-WIRE");

    let captured = server.await.unwrap();
    assert!(captured.request_line.starts_with("POST /v2/files "));
    assert_eq!(captured.header("Authorization"), Some("QQBot tok-wire"));
    assert_eq!(captured.header("X-Union-Appid"), Some("1024"));

    let content_type = captured
        .header("Content-Type")
        .expect("multipart content type")
        .to_string();
    assert!(content_type.starts_with("multipart/form-data; boundary="));

    parse_form(&content_type, captured.body).await
}

#[tokio::test]
async fn test_binary_file_survives_the_wire() {
    // Every byte value, plus sequences that look like multipart framing.
    let mut data: Vec<u8> = (0..=255u8).collect();
    data.extend_from_slice(b"\r\n--\r\n\r\n--boundary--\r\n");
    data.extend((0..=255u8).rev());
    let file = MediaFile::new("/tmp/blob.bin", data.clone());

    let fields = upload_over_the_wire(&file, MediaVariant::File).await;

    let names: Vec<Option<&str>> = fields.iter().map(|f| f.name.as_deref()).collect();
    assert_eq!(names, [Some("file_type"), Some("file_type_data"), Some("file")]);

    assert_eq!(fields[0].data, b"4");
    assert!(fields[0].file_name.is_none());
    assert_eq!(fields[1].data, b"bin");

    assert_eq!(fields[2].file_name.as_deref(), Some("blob.bin"));
    assert_eq!(
        fields[2].content_type.as_deref(),
        Some("application/octet-stream")
    );
    assert_eq!(fields[2].data, data);
}

#[tokio::test]
async fn test_empty_file_survives_the_wire() {
    let file = MediaFile::new("empty.txt", Vec::new());

    let fields = upload_over_the_wire(&file, MediaVariant::File).await;

    assert_eq!(fields.len(), 3);
    assert_eq!(fields[1].data, b"txt");
    assert_eq!(fields[2].file_name.as_deref(), Some("empty.txt"));
    assert!(fields[2].data.is_empty());
}

#[tokio::test]
async fn test_image_variant_on_the_wire() {
    let jpeg = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46];
    let file = MediaFile::new("holiday.jpeg", jpeg.clone());

    let fields = upload_over_the_wire(&file, MediaVariant::Image).await;

    assert_eq!(fields[0].data, b"1");
    assert_eq!(fields[1].data, b"jpeg");
    assert_eq!(fields[2].file_name.as_deref(), Some("image.jpeg"));
    assert_eq!(fields[2].content_type.as_deref(), Some("image/jpeg"));
    assert_eq!(fields[2].data, jpeg);
}

#[tokio::test]
async fn test_filename_is_sent_verbatim() {
    let file = MediaFile::new("/tmp/my report (final)&v2.pdf", b"%PDF".to_vec());

    let fields = upload_over_the_wire(&file, MediaVariant::File).await;

    assert_eq!(
        fields[2].file_name.as_deref(),
        Some("my report (final)&v2.pdf")
    );
}
