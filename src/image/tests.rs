use super::*;

#[tokio::test]
async fn test_url_input_passes_through() {
    let reference = DataUrlPreparer
        .prepare(&ImageInput::url("https://labels.example.com/front.jpg"))
        .await
        .unwrap();
    assert_eq!(reference.as_str(), "https://labels.example.com/front.jpg");
}

#[tokio::test]
async fn test_bytes_become_data_url() {
    let reference = DataUrlPreparer
        .prepare(&ImageInput::bytes(vec![1, 2, 3], "IMAGE/PNG"))
        .await
        .unwrap();
    assert_eq!(reference.as_str(), "data:image/png;base64,AQID");
    assert!(reference.to_string().starts_with("data:<"));
}

#[tokio::test]
async fn test_rejects_bad_inputs() {
    let preparer = DataUrlPreparer;
    assert_eq!(
        preparer.prepare(&ImageInput::url("  ")).await,
        Err(ImageError::Empty)
    );
    assert!(matches!(
        preparer.prepare(&ImageInput::url("ftp://host/label.png")).await,
        Err(ImageError::InvalidUrl(_))
    ));
    assert!(matches!(
        preparer.prepare(&ImageInput::url("not a url")).await,
        Err(ImageError::InvalidUrl(_))
    ));
    assert_eq!(
        preparer.prepare(&ImageInput::bytes(vec![], "image/png")).await,
        Err(ImageError::Empty)
    );
    assert!(matches!(
        preparer.prepare(&ImageInput::bytes(vec![0], "application/pdf")).await,
        Err(ImageError::UnsupportedMimeType(_))
    ));
}

#[test]
fn test_uploaded_bytes_accept_data_url_prefix() {
    let plain: ImageInput =
        serde_json::from_value(serde_json::json!({ "data": "AQID", "mimeType": "image/png" }))
            .unwrap();
    let prefixed: ImageInput = serde_json::from_value(serde_json::json!({
        "data": "data:image/png;base64,AQID",
        "mimeType": "image/png"
    }))
    .unwrap();
    assert_eq!(plain, prefixed);
    assert_eq!(plain, ImageInput::bytes(vec![1, 2, 3], "image/png"));

    assert!(
        serde_json::from_value::<ImageInput>(
            serde_json::json!({ "data": "***", "mimeType": "image/png" })
        )
        .is_err()
    );
}

#[test]
fn test_image_input_wire_shapes() {
    let url: ImageInput = serde_json::from_str(r#"{"url":"https://x.test/a.png"}"#).unwrap();
    assert_eq!(url, ImageInput::url("https://x.test/a.png"));

    let bytes: ImageInput =
        serde_json::from_str(r#"{"data":"AQID","mimeType":"image/jpeg"}"#).unwrap();
    assert_eq!(bytes, ImageInput::bytes(vec![1, 2, 3], "image/jpeg"));

    assert!(serde_json::from_str::<ImageInput>(r#"{"data":"***","mimeType":"image/jpeg"}"#).is_err());
}

#[test]
fn test_fingerprint_is_stable_and_short() {
    let a = ImageReference::new("https://x.test/a.png");
    let b = ImageReference::new("https://x.test/b.png");
    assert_eq!(a.fingerprint(), a.fingerprint());
    assert_ne!(a.fingerprint(), b.fingerprint());
    assert_eq!(a.fingerprint().len(), 16);
    assert!(ImageError::Empty.is_client_error());
    assert!(!ImageError::Upload("s3".into()).is_client_error());
}
