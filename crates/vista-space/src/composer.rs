//! Seeded composition of a full space vista.
//!
//! The composer builds its [`GenerationQueue`] once from coin flips on the
//! run's random stream, then lazily resolves each queued kind to a concrete
//! generator with freshly drawn parameters. Generators run strictly one at a
//! time against the shared canvas.

use std::collections::VecDeque;
use std::fmt;

use tracing::{debug, info};
use vista_noise::{GradientNoise3D, RandomSource, Seed, SeededRandom};
use vista_raster::{FlushPolicy, GeneratorState, Incremental, PixelBuffer, Progress, Rgb};

use crate::error::SpaceError;
use crate::glow::GlowSourceGenerator;
use crate::layer::{CanvasLayer, LayerGenerator};
use crate::nebula::NebulaGenerator;
use crate::point_stars::PointStarField;
use crate::star::StarGenerator;

/// Probability of queueing one more star after each star.
const STAR_CONTINUE: f64 = 0.95;

/// Probability of queueing one more nebula after each nebula.
const NEBULA_CONTINUE: f64 = 0.5;

/// The kinds of layer a vista is built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GeneratorKind {
    PointStars,
    Star,
    Nebula,
    Sun,
}

impl GeneratorKind {
    pub fn label(&self) -> &'static str {
        match self {
            GeneratorKind::PointStars => "point stars",
            GeneratorKind::Star => "star",
            GeneratorKind::Nebula => "nebula",
            GeneratorKind::Sun => "sun",
        }
    }
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What to render and at which size.
#[derive(Clone, Debug, PartialEq)]
pub struct VistaOptions {
    pub seed: Seed,
    pub width: u32,
    pub height: u32,
    /// Scatter background point stars before the queued layers.
    pub point_stars: bool,
    pub stars: bool,
    pub nebulae: bool,
    pub sun: bool,
}

impl Default for VistaOptions {
    fn default() -> Self {
        Self {
            seed: Seed::default(),
            width: 1024,
            height: 1024,
            point_stars: true,
            stars: true,
            nebulae: true,
            sun: true,
        }
    }
}

/// Ordered generator kinds, consumed front to back.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenerationQueue {
    kinds: VecDeque<GeneratorKind>,
}

impl GenerationQueue {
    /// Draw a queue: one mandatory star then more while `random() < 0.95`, one
    /// mandatory nebula then more while `random() < 0.5`, then the sun.
    /// Disabled categories draw nothing.
    pub fn build(options: &VistaOptions, rng: &mut impl RandomSource) -> Self {
        let mut kinds = VecDeque::new();
        if options.point_stars {
            kinds.push_back(GeneratorKind::PointStars);
        }
        if options.stars {
            kinds.push_back(GeneratorKind::Star);
            while rng.next_f64() < STAR_CONTINUE {
                kinds.push_back(GeneratorKind::Star);
            }
        }
        if options.nebulae {
            kinds.push_back(GeneratorKind::Nebula);
            while rng.next_f64() < NEBULA_CONTINUE {
                kinds.push_back(GeneratorKind::Nebula);
            }
        }
        if options.sun {
            kinds.push_back(GeneratorKind::Sun);
        }
        Self { kinds }
    }

    pub fn pop_front(&mut self) -> Option<GeneratorKind> {
        self.kinds.pop_front()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GeneratorKind> {
        self.kinds.iter()
    }

    /// Number of queued entries of `kind`.
    pub fn count(&self, kind: GeneratorKind) -> usize {
        self.kinds.iter().filter(|k| **k == kind).count()
    }
}

/// One report from [`VistaComposer::advance`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VistaProgress {
    /// The kind that was just stepped, `None` once everything is done.
    pub kind: Option<GeneratorKind>,
    /// Progress of the current generator.
    pub fraction: f64,
    /// Layers completed so far.
    pub completed: usize,
    /// Layers in the whole run.
    pub total: usize,
    /// Set once the queue is exhausted.
    pub finished: bool,
}

impl VistaProgress {
    /// Whole-run completion in `[0, 1]`.
    pub fn overall(&self) -> f64 {
        if self.finished || self.total == 0 {
            1.0
        } else {
            (self.completed as f64 + self.fraction) / self.total as f64
        }
    }
}

/// Drives a randomized layer queue to completion on one canvas.
pub struct VistaComposer<R: RandomSource = SeededRandom> {
    options: VistaOptions,
    canvas: PixelBuffer,
    rng: R,
    queue: GenerationQueue,
    active: Option<(GeneratorKind, LayerGenerator)>,
    scale: f64,
    completed: usize,
    total: usize,
    state: GeneratorState,
}

impl VistaComposer<SeededRandom> {
    /// Create a composer whose draws come from `options.seed`.
    pub fn new(options: VistaOptions, policy: FlushPolicy) -> Result<Self, SpaceError> {
        let rng = SeededRandom::new(&options.seed);
        Self::with_rng(options, policy, rng)
    }
}

impl<R: RandomSource> VistaComposer<R> {
    /// Create a composer drawing queue and layer parameters from `rng`.
    ///
    /// The point-star field always draws from its own stream seeded by
    /// `options.seed`, so enabling it never perturbs the queue.
    pub fn with_rng(
        options: VistaOptions,
        policy: FlushPolicy,
        mut rng: R,
    ) -> Result<Self, SpaceError> {
        let canvas = PixelBuffer::opaque(options.width, options.height, Rgb::BLACK, policy)?;
        let queue = GenerationQueue::build(&options, &mut rng);
        info!(
            seed = %options.seed,
            width = options.width,
            height = options.height,
            stars = queue.count(GeneratorKind::Star),
            nebulae = queue.count(GeneratorKind::Nebula),
            sun = queue.count(GeneratorKind::Sun),
            "vista queue built"
        );
        Ok(Self {
            scale: options.width.max(options.height) as f64,
            total: queue.len(),
            options,
            canvas,
            rng,
            queue,
            active: None,
            completed: 0,
            state: GeneratorState::Pending,
        })
    }

    fn spawn(&mut self, kind: GeneratorKind) -> LayerGenerator {
        let (w, h) = (self.options.width, self.options.height);
        match kind {
            GeneratorKind::PointStars => LayerGenerator::PointStars(PointStarField::new(
                w,
                h,
                SeededRandom::new(&self.options.seed),
            )),
            GeneratorKind::Star => {
                let x = self.rng.next_f64() * w as f64;
                let y = self.rng.next_f64() * h as f64;
                let size = self.rng.next_f64() * 0.001 * self.scale;
                debug!(x, y, size, "spawning star");
                LayerGenerator::Star(StarGenerator::from_parts(Rgb::WHITE, x, y, size))
            }
            GeneratorKind::Nebula => {
                let color = Rgb::new(self.rng.next_f64(), self.rng.next_f64(), self.rng.next_f64());
                let intensity = self.rng.next_f64() * 0.2 + 1.0;
                let falloff = self.rng.next_f64() * 3.0 + 3.0;
                let noise_seed = Seed::Text(self.rng.next_f64().to_string());
                debug!(?color, intensity, falloff, "spawning nebula");
                LayerGenerator::Nebula(NebulaGenerator::from_parts(
                    color,
                    self.scale / 4.0,
                    intensity,
                    falloff,
                    GradientNoise3D::from_seed(&noise_seed),
                    w,
                    h,
                ))
            }
            GeneratorKind::Sun => {
                let color = if self.rng.next_f64() < 0.5 {
                    Rgb::new(1.0, self.rng.next_f64(), self.rng.next_f64() * 0.25)
                } else {
                    Rgb::new(self.rng.next_f64() * 0.25, self.rng.next_f64(), 1.0)
                };
                let x = self.rng.next_f64() * w as f64;
                let y = self.rng.next_f64() * h as f64;
                let size = self.scale * (self.rng.next_f64() * 0.1 + 0.01);
                debug!(?color, x, y, size, "spawning sun");
                LayerGenerator::Glow(GlowSourceGenerator::from_parts(color, x, y, size, w, h))
            }
        }
    }

    /// Perform one unit of work on the current layer, starting the next
    /// queued layer when needed.
    pub fn advance(&mut self) -> VistaProgress {
        if self.state == GeneratorState::Done {
            return self.done_report();
        }
        if self.active.is_none() {
            match self.queue.pop_front() {
                Some(kind) => {
                    let generator = self.spawn(kind);
                    self.active = Some((kind, generator));
                }
                None => {
                    self.finish();
                    return self.done_report();
                }
            }
        }
        self.state = GeneratorState::Running;

        let Some((kind, generator)) = self.active.as_mut() else {
            return self.done_report();
        };
        let kind = *kind;
        let progress = generator.advance(&mut self.canvas);
        if progress.finished {
            self.canvas.flush();
            self.active = None;
            self.completed += 1;
            debug!(%kind, completed = self.completed, total = self.total, "layer finished");
            if self.queue.is_empty() {
                self.finish();
                return self.done_report();
            }
        }
        VistaProgress {
            kind: Some(kind),
            fraction: progress.fraction,
            completed: self.completed,
            total: self.total,
            finished: false,
        }
    }

    fn finish(&mut self) {
        if self.state != GeneratorState::Done {
            self.canvas.flush();
            self.state = GeneratorState::Done;
            info!(layers = self.completed, "vista complete");
        }
    }

    fn done_report(&self) -> VistaProgress {
        VistaProgress {
            kind: None,
            fraction: 1.0,
            completed: self.completed,
            total: self.total,
            finished: true,
        }
    }

    /// Remaining work, with runs of consecutive stars collapsed to "stars".
    pub fn activity_labels(&self) -> Vec<String> {
        let pending = self
            .active
            .as_ref()
            .map(|(kind, _)| *kind)
            .into_iter()
            .chain(self.queue.iter().copied());
        let mut labels: Vec<String> = Vec::new();
        let mut previous = None;
        for kind in pending {
            match kind {
                GeneratorKind::Star if previous == Some(GeneratorKind::Star) => {}
                GeneratorKind::Star => labels.push("stars".to_string()),
                other => labels.push(other.label().to_string()),
            }
            previous = Some(kind);
        }
        labels
    }

    /// The kind currently being drawn.
    pub fn current_kind(&self) -> Option<GeneratorKind> {
        self.active.as_ref().map(|(kind, _)| *kind)
    }

    /// The queued kinds not yet started.
    pub fn queue(&self) -> &GenerationQueue {
        &self.queue
    }

    pub fn canvas(&self) -> &PixelBuffer {
        &self.canvas
    }

    pub fn into_canvas(self) -> PixelBuffer {
        self.canvas
    }

    pub fn options(&self) -> &VistaOptions {
        &self.options
    }

    pub fn state(&self) -> GeneratorState {
        self.state
    }
}

impl<R: RandomSource> Incremental for VistaComposer<R> {
    fn advance(&mut self) -> Progress {
        let report = VistaComposer::advance(self);
        Progress {
            fraction: report.overall(),
            finished: report.finished,
        }
    }

    fn state(&self) -> GeneratorState {
        self.state
    }

    fn status_label(&self) -> String {
        if self.state == GeneratorState::Done {
            return "Rendering complete.".to_string();
        }
        match self.activity_labels().first() {
            Some(label) => format!("Rendering {label}"),
            None => "Rendering".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A stream that always returns the same value.
    struct Constant(f64);

    impl RandomSource for Constant {
        fn next_f64(&mut self) -> f64 {
            self.0
        }
    }

    fn options(w: u32, h: u32) -> VistaOptions {
        VistaOptions {
            seed: Seed::from("composer"),
            width: w,
            height: h,
            ..Default::default()
        }
    }

    #[test]
    fn test_queue_minimum_when_flips_fail() {
        let opts = VistaOptions {
            point_stars: false,
            sun: false,
            ..options(8, 8)
        };
        let queue = GenerationQueue::build(&opts, &mut Constant(0.99));
        let kinds: Vec<_> = queue.iter().copied().collect();
        assert_eq!(kinds, vec![GeneratorKind::Star, GeneratorKind::Nebula]);
    }

    #[test]
    fn test_queue_order_and_toggles() {
        let queue = GenerationQueue::build(&options(8, 8), &mut Constant(0.99));
        let kinds: Vec<_> = queue.iter().copied().collect();
        assert_eq!(
            kinds,
            vec![
                GeneratorKind::PointStars,
                GeneratorKind::Star,
                GeneratorKind::Nebula,
                GeneratorKind::Sun
            ]
        );

        let none = VistaOptions {
            point_stars: false,
            stars: false,
            nebulae: false,
            sun: false,
            ..options(8, 8)
        };
        assert!(GenerationQueue::build(&none, &mut Constant(0.0)).is_empty());
    }

    #[test]
    fn test_star_loop_keeps_drawing_while_below_threshold() {
        /// Below both thresholds for `n` draws, then above.
        struct Countdown(u32);
        impl RandomSource for Countdown {
            fn next_f64(&mut self) -> f64 {
                if self.0 == 0 {
                    0.99
                } else {
                    self.0 -= 1;
                    0.1
                }
            }
        }
        let opts = VistaOptions {
            nebulae: false,
            ..options(8, 8)
        };
        let queue = GenerationQueue::build(&opts, &mut Countdown(4));
        assert_eq!(queue.count(GeneratorKind::Star), 5);
    }

    #[test]
    fn test_empty_queue_finishes_immediately() {
        let opts = VistaOptions {
            point_stars: false,
            stars: false,
            nebulae: false,
            sun: false,
            ..options(4, 4)
        };
        let mut composer = VistaComposer::new(opts, FlushPolicy::default()).unwrap();
        let report = composer.advance();
        assert!(report.finished);
        assert_eq!(report.kind, None);
        assert_eq!(composer.status_label(), "Rendering complete.");
    }

    #[test]
    fn test_activity_labels_collapse_stars() {
        let opts = options(8, 8);
        let mut composer =
            VistaComposer::with_rng(opts, FlushPolicy::default(), Countdown3 { left: 3 }).unwrap();
        assert_eq!(
            composer.activity_labels(),
            vec!["point stars", "stars", "nebula", "sun"]
        );
        assert_eq!(composer.queue().count(GeneratorKind::Star), 4);
        assert_eq!(composer.queue().count(GeneratorKind::Nebula), 1);
        composer.advance();
        assert_eq!(composer.status_label(), "Rendering point stars");
    }

    /// Three draws below both thresholds, then above both.
    struct Countdown3 {
        left: u32,
    }

    impl RandomSource for Countdown3 {
        fn next_f64(&mut self) -> f64 {
            if self.left == 0 {
                0.99
            } else {
                self.left -= 1;
                0.25
            }
        }
    }

    #[test]
    fn test_rejects_zero_sized_canvas() {
        assert!(matches!(
            VistaComposer::new(options(0, 10), FlushPolicy::default()),
            Err(SpaceError::Raster(_))
        ));
    }

    #[test]
    fn test_idempotent_completion() {
        let mut composer = VistaComposer::with_rng(
            VistaOptions {
                point_stars: false,
                nebulae: false,
                ..options(16, 16)
            },
            FlushPolicy::default(),
            Constant(0.99),
        )
        .unwrap();
        let mut guard = 0;
        while !composer.advance().finished {
            guard += 1;
            assert!(guard < 1_000_000);
        }
        let front = composer.canvas().front().clone();
        for _ in 0..10 {
            let report = composer.advance();
            assert!(report.finished);
            assert_eq!(report.overall(), 1.0);
        }
        assert_eq!(composer.canvas().front(), &front);
        assert_eq!(composer.canvas().front(), composer.canvas().back());
    }
}
