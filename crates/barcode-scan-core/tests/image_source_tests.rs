//! Tests acquisition tagging on acquired images.

use barcode_scan_core::{AcquiredImage, ImageSource};

#[test]
fn image_source_tests_tags_each_variant() {
    let camera = AcquiredImage::camera("data:image/png;base64,AAAA").expect("camera image");
    let upload = AcquiredImage::upload(vec![1, 2, 3], "code.png", Some("image/png".to_string()))
        .expect("upload image");

    assert_eq!(camera.source(), ImageSource::Camera);
    assert_eq!(upload.source(), ImageSource::Upload);
}
