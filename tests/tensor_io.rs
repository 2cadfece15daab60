#![cfg(feature = "tensor-io")]

use yolopost::io::{load_raw_tensor, save_raw_tensor};
use yolopost::{Anchor, DecodeConfig, Detector, TensorShape, TensorView, YoloPostError};

fn dump_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("yolopost-{}-{name}.bin", std::process::id()))
}

#[test]
fn reloaded_dump_detects_like_the_source_buffer() {
    let cfg = DecodeConfig::new(2, vec![Anchor::new(1.0, 1.0)], 2).with_score_threshold(0.4);
    let channels = cfg.expected_channels();
    let mut data = vec![-6.0f32; 2 * channels * 4];
    // Image 1, objectness plane (channel 4), cell (1, 0).
    data[channels * 4 + 4 * 4 + 2] = 7.0;
    data[channels * 4 + 5 * 4 + 2] = 5.0;
    let view = TensorView::from_slice(&data, 2, channels, 2, 2).unwrap();

    let path = dump_path("detect");
    save_raw_tensor(&path, view).unwrap();
    let loaded = load_raw_tensor(&path, TensorShape::new(2, channels, 2, 2)).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded.data(), &data[..]);
    let detector = Detector::new(cfg).unwrap();
    let dets = detector.detect(loaded.view()).unwrap();
    assert_eq!(dets, detector.detect(view).unwrap());
    assert_eq!(dets.len(), 1);
    assert_eq!(dets[0].class_index, 0);
}

#[test]
fn short_dump_is_reported() {
    let data = [1.0f32, 2.0, 3.0];
    let view = TensorView::from_slice(&data, 1, 3, 1, 1).unwrap();
    let path = dump_path("short");
    save_raw_tensor(&path, view).unwrap();
    let err = load_raw_tensor(&path, TensorShape::new(1, 4, 1, 1))
        .err()
        .unwrap();
    std::fs::remove_file(&path).ok();
    assert!(matches!(err, YoloPostError::TensorIo { .. }));
}
