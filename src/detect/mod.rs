//! Detection orchestration over a batch of raw tensors.
//!
//! A [`Detector`] validates its [`DecodeConfig`] once, then for every image
//! re-lays the tensor, decodes candidates, and runs multi-label suppression.
//! It keeps no state between calls besides the configuration, so one detector
//! can be shared across threads and reused with different tensors.

mod workspace;

pub use workspace::Workspace;

use crate::candidate::nms::{collect_detections, suppress_all, NmsParams};
use crate::config::DecodeConfig;
use crate::decode::decode_grid;
use crate::tensor::TensorView;
use crate::trace::{trace_event, trace_span};
use crate::types::{DetectionBox, ImageDetections};
use crate::util::YoloPostResult;
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Decoder plus suppressor bound to one configuration.
#[derive(Clone, Debug)]
pub struct Detector {
    cfg: DecodeConfig,
    parallel: bool,
}

impl Detector {
    /// Creates a detector, rejecting invalid configurations.
    pub fn new(cfg: DecodeConfig) -> YoloPostResult<Self> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            parallel: false,
        })
    }

    /// Enables image- and class-parallel execution when built with `rayon`.
    ///
    /// Results are identical to the sequential path.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    pub fn config(&self) -> &DecodeConfig {
        &self.cfg
    }

    pub fn nms_params(&self) -> NmsParams {
        NmsParams {
            score_threshold: self.cfg.score_threshold,
            iou_threshold: self.cfg.iou_threshold,
        }
    }

    /// Detects over the whole batch and returns detections in batch order.
    ///
    /// Every image is processed; the first per-image error, if any, is
    /// returned after the batch completes.
    pub fn detect(&self, view: TensorView<'_>) -> YoloPostResult<Vec<DetectionBox>> {
        let mut out = Vec::new();
        for result in self.detect_batch(view)? {
            out.extend(result?.detections);
        }
        Ok(out)
    }

    /// Detects over the whole batch, isolating failures per image.
    ///
    /// The outer error is a configuration mismatch and means nothing was
    /// decoded.
    pub fn detect_batch(
        &self,
        view: TensorView<'_>,
    ) -> YoloPostResult<Vec<YoloPostResult<ImageDetections>>> {
        self.cfg.validate_shape(view.shape())?;
        if view.batch() == 0 {
            return Ok(Vec::new());
        }
        let _span = trace_span!("detect_batch", batch = view.batch()).entered();

        #[cfg(feature = "rayon")]
        if self.parallel {
            return Ok((0..view.batch())
                .into_par_iter()
                .map_init(
                    || Workspace::for_config(&self.cfg),
                    |ws, image| self.run_image(view, image, ws),
                )
                .collect());
        }

        let mut ws = Workspace::for_config(&self.cfg);
        Ok((0..view.batch())
            .map(|image| self.run_image(view, image, &mut ws))
            .collect())
    }

    /// Detects on image `image` of the batch.
    pub fn detect_image(
        &self,
        view: TensorView<'_>,
        image: usize,
    ) -> YoloPostResult<ImageDetections> {
        let mut ws = Workspace::for_config(&self.cfg);
        self.detect_image_with(view, image, &mut ws)
    }

    /// Detects on image `image`, reusing the buffers of `ws`.
    pub fn detect_image_with(
        &self,
        view: TensorView<'_>,
        image: usize,
        ws: &mut Workspace,
    ) -> YoloPostResult<ImageDetections> {
        self.cfg.validate_shape(view.shape())?;
        self.run_image(view, image, ws)
    }

    fn run_image(
        &self,
        view: TensorView<'_>,
        image: usize,
        ws: &mut Workspace,
    ) -> YoloPostResult<ImageDetections> {
        let _span = trace_span!("detect_image", image = image).entered();

        ws.grid.load_nchw(
            view,
            image,
            self.cfg.num_anchors(),
            self.cfg.features_per_anchor(),
        )?;
        let stats = decode_grid(
            &ws.grid,
            &self.cfg,
            &mut ws.logits,
            &mut ws.boxes,
            &mut ws.probs,
        )?;

        let kept = self.suppress(ws)?;
        let detections = collect_detections(&ws.boxes, &ws.probs);
        trace_event!("suppressed", kept = kept, detections = detections.len());

        Ok(ImageDetections {
            image,
            detections,
            stats,
        })
    }

    fn suppress(&self, ws: &mut Workspace) -> YoloPostResult<usize> {
        let _span = trace_span!("suppress_multilabel", classes = self.cfg.num_classes).entered();
        let params = self.nms_params();

        #[cfg(feature = "rayon")]
        if self.parallel {
            return crate::candidate::rayon::suppress_all_par(&ws.boxes, &mut ws.probs, params);
        }

        suppress_all(&ws.boxes, &mut ws.probs, &mut ws.order, params)
    }
}
