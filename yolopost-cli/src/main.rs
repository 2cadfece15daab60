use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use yolopost::io::{draw_detections, load_raw_tensor, load_rgb_image, save_rgb_image, BOX_COLOR};
use yolopost::{
    format_box_info, Anchor, DecodeConfig, DetectionBox, Detector, ImageDetections, TensorShape,
    VOC_ANCHORS,
};

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "YOLOv2 region output post-processing (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Default, Deserialize)]
struct ShapeJson {
    batch: usize,
    channels: usize,
    height: usize,
    width: usize,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct DecodeConfigJson {
    side: usize,
    num_classes: usize,
    anchors: Vec<f32>,
    score_threshold: f32,
    iou_threshold: f32,
    parallel: bool,
}

impl Default for DecodeConfigJson {
    fn default() -> Self {
        let cfg = DecodeConfig::default();
        Self {
            side: cfg.side,
            num_classes: cfg.num_classes,
            anchors: VOC_ANCHORS.to_vec(),
            score_threshold: cfg.score_threshold,
            iou_threshold: cfg.iou_threshold,
            parallel: false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    tensor_path: String,
    shape: ShapeJson,
    decode: DecodeConfigJson,
    image_path: Option<String>,
    image_index: usize,
    annotated_path: Option<String>,
    box_info_path: Option<String>,
    output_path: Option<String>,
}

#[derive(Debug, Serialize)]
struct RectRecord {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

#[derive(Debug, Serialize)]
struct DetectionRecord {
    class_index: usize,
    score: f32,
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pixel: Option<RectRecord>,
}

impl DetectionRecord {
    fn new(det: &DetectionBox, image_size: Option<(u32, u32)>) -> Self {
        let pixel = image_size.map(|(w, h)| {
            let rect = det.to_pixel_rect(w, h);
            RectRecord {
                x: rect.x,
                y: rect.y,
                width: rect.width,
                height: rect.height,
            }
        });
        Self {
            class_index: det.class_index,
            score: det.score,
            x: det.bbox.x,
            y: det.bbox.y,
            w: det.bbox.w,
            h: det.bbox.h,
            pixel,
        }
    }
}

#[derive(Debug, Serialize)]
struct ImageRecord {
    image: usize,
    candidates: usize,
    anomalies: usize,
    detections: Vec<DetectionRecord>,
}

#[derive(Debug, Serialize)]
struct Output {
    images: Vec<ImageRecord>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("yolopost=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.tensor_path.is_empty() {
        return Err("tensor_path must be set in the config".into());
    }

    let decode_cfg = DecodeConfig::new(
        config.decode.side,
        Anchor::from_flat(&config.decode.anchors)?,
        config.decode.num_classes,
    )
    .with_score_threshold(config.decode.score_threshold)
    .with_iou_threshold(config.decode.iou_threshold);
    let detector = Detector::new(decode_cfg)?.with_parallel(config.decode.parallel);

    let shape = TensorShape::new(
        config.shape.batch,
        config.shape.channels,
        config.shape.height,
        config.shape.width,
    );
    let tensor = load_raw_tensor(&config.tensor_path, shape)?;

    let mut results: Vec<ImageDetections> = Vec::with_capacity(shape.batch);
    for result in detector.detect_batch(tensor.view())? {
        match result {
            Ok(found) => results.push(found),
            Err(err) => tracing::warn!(error = %err, "image skipped"),
        }
    }

    let selected = results
        .iter()
        .find(|r| r.image == config.image_index)
        .map(|r| r.detections.as_slice())
        .unwrap_or(&[]);

    let mut image_size = None;
    if let Some(path) = &config.image_path {
        let mut rgb = load_rgb_image(path)?;
        image_size = Some(rgb.dimensions());
        if let Some(out) = &config.annotated_path {
            draw_detections(&mut rgb, selected, BOX_COLOR);
            save_rgb_image(&rgb, out)?;
        }
    }

    if let Some(path) = &config.box_info_path {
        fs::write(path, format_box_info(selected))?;
    }

    let images = results
        .iter()
        .map(|r| {
            let size = if r.image == config.image_index {
                image_size
            } else {
                None
            };
            ImageRecord {
                image: r.image,
                candidates: r.stats.candidates,
                anomalies: r.stats.anomalies,
                detections: r
                    .detections
                    .iter()
                    .map(|d| DetectionRecord::new(d, size))
                    .collect(),
            }
        })
        .collect();
    let json = serde_json::to_string_pretty(&Output { images })?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
