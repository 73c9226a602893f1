// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Anatomy session state.
//!
//! The session owns the uploaded image, the feature notes, the four
//! marker layers and the interaction mode. It runs the scripted analysis
//! and the massage game. All operations are driven by the UI with the
//! current frame time; nothing here touches egui.

use super::lore::{ANALYSIS_QUOTES, ANALYSIS_TOOLS, CORRECTION_QUOTES, MASSAGE_QUOTES};
use super::marker::{ContainerSize, LayerKind, LayerSet, MarkerPoint};
use crate::config::AppConfig;
use crate::util::geometry::{band_center_y, sample_x};
use crate::util::schedule::{Pipeline, RepeatingTask};
use rand::{rngs::StdRng, Rng};

/// The uploaded image. Only its identity and natural size matter here.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionImage {
    pub name: String,
    pub width: u32,
    pub height: u32,
}

/// Progress of the scripted analysis.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Idle,
    Analyzing(Pipeline),
    Complete,
}

/// Progress of a massage round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Round {
    /// Massage mode is on but no round has been started.
    Waiting,
    Running,
    /// Every massage point was found; clicks are ignored until the next start.
    Ended,
}

/// Interaction mode. Editing and massaging exclude each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Viewing,
    Editing,
    Massaging(Round),
}

/// Something the user should be told about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    AnalysisComplete,
    PointCorrected { label: String },
    PointActivated { label: String },
    RoundComplete { total: usize },
}

/// Anatomy session controller.
pub struct Session {
    image: Option<SessionImage>,
    features: String,
    layers: LayerSet,
    active_layer: LayerKind,
    mode: Mode,
    phase: Phase,
    quote: Option<&'static str>,
    /// Analysis quotes; only armed while viewing an analysis
    quote_ticker: Option<RepeatingTask>,
    /// Massage quotes; only armed while a round is running
    massage_ticker: Option<RepeatingTask>,
    notices: Vec<Notice>,
    rng: StdRng,
    tool_dwell: f64,
    quote_interval: f64,
    massage_quote_interval: f64,
    edge_margin: f32,
}

impl Session {
    /// Create an empty session.
    pub fn new(config: &AppConfig, rng: StdRng) -> Self {
        Self {
            image: None,
            features: String::new(),
            layers: LayerSet::new(),
            active_layer: LayerKind::Surface,
            mode: Mode::Viewing,
            phase: Phase::Idle,
            quote: None,
            quote_ticker: None,
            massage_ticker: None,
            notices: Vec::new(),
            rng,
            tool_dwell: config.tool_dwell_secs,
            quote_interval: config.quote_interval_secs,
            massage_quote_interval: config.massage_quote_interval_secs,
            edge_margin: config.edge_margin,
        }
    }

    // ---- accessors ----

    pub fn image(&self) -> Option<&SessionImage> {
        self.image.as_ref()
    }

    /// Coordinate space of the markers: the image's natural size in pixels.
    /// The canvas scales it to wherever the image is drawn.
    pub fn container(&self) -> Option<ContainerSize> {
        self.image
            .as_ref()
            .map(|img| ContainerSize::new(img.width as f32, img.height as f32))
    }

    /// Feature notes, for binding to a text field.
    pub fn features_mut(&mut self) -> &mut String {
        &mut self.features
    }

    pub fn set_features(&mut self, features: impl Into<String>) {
        self.features = features.into();
    }

    pub fn layers(&self) -> &LayerSet {
        &self.layers
    }

    pub fn active_layer(&self) -> LayerKind {
        self.active_layer
    }

    pub fn active_points(&self) -> &[MarkerPoint] {
        self.layers.get(self.active_layer)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_analyzing(&self) -> bool {
        matches!(self.phase, Phase::Analyzing(_))
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    pub fn is_editing(&self) -> bool {
        self.mode == Mode::Editing
    }

    pub fn is_massaging(&self) -> bool {
        matches!(self.mode, Mode::Massaging(_))
    }

    pub fn round(&self) -> Option<Round> {
        match self.mode {
            Mode::Massaging(round) => Some(round),
            _ => None,
        }
    }

    pub fn quote(&self) -> Option<&'static str> {
        self.quote
    }

    /// The analysis tool on screen at `now`, if an analysis is running.
    pub fn current_tool(&self, now: f64) -> Option<&'static str> {
        match &self.phase {
            Phase::Analyzing(pipeline) => pipeline.current_tool(now),
            _ => None,
        }
    }

    /// Number of massage points found in the current round.
    pub fn massage_score(&self) -> usize {
        self.layers
            .get(LayerKind::Massage)
            .iter()
            .filter(|p| p.is_found)
            .count()
    }

    pub fn massage_total(&self) -> usize {
        self.layers.get(LayerKind::Massage).len()
    }

    /// Take the notices raised since the last call.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Earliest time at which `tick` has work to do.
    pub fn next_deadline(&self, now: f64) -> Option<f64> {
        let pipeline = match &self.phase {
            Phase::Analyzing(pipeline) => Some(pipeline.next_deadline(now)),
            _ => None,
        };
        [
            pipeline,
            self.quote_ticker.as_ref().map(RepeatingTask::next_deadline),
            self.massage_ticker.as_ref().map(RepeatingTask::next_deadline),
        ]
        .into_iter()
        .flatten()
        .reduce(f64::min)
    }

    // ---- image and analysis ----

    /// Replace the image. Clears every layer, leaves both modes and
    /// cancels an analysis that is still running.
    pub fn upload_image(&mut self, image: SessionImage) {
        if self.is_analyzing() {
            log::warn!("New image while analyzing, cancelling the running analysis");
        }
        log::info!("Image set: {} ({}x{})", image.name, image.width, image.height);

        self.image = Some(image);
        self.layers.clear();
        self.phase = Phase::Idle;
        self.mode = Mode::Viewing;
        self.active_layer = LayerKind::Surface;
        self.quote = None;
        self.quote_ticker = None;
        self.massage_ticker = None;
    }

    /// Whether `analyze` would start an analysis.
    pub fn can_analyze(&self) -> bool {
        self.image.is_some() && !self.features.trim().is_empty() && !self.is_analyzing()
    }

    /// Start the scripted analysis. A no-op without an image and notes, or while one is running.
    pub fn analyze(&mut self, now: f64) -> bool {
        if !self.can_analyze() {
            log::debug!("Analysis request ignored");
            return false;
        }

        log::info!("Analysis started");
        self.layers.clear();
        self.mode = Mode::Viewing;
        self.active_layer = LayerKind::Surface;
        self.massage_ticker = None;
        self.phase = Phase::Analyzing(Pipeline::start(now, ANALYSIS_TOOLS, self.tool_dwell));
        self.start_quote_ticker(now);
        true
    }

    /// Advance timers.
    pub fn tick(&mut self, now: f64) {
        let finished = matches!(&self.phase, Phase::Analyzing(p) if p.is_finished(now));
        if finished {
            match self.container() {
                Some(size) => self.complete_analysis(size),
                None => {
                    log::warn!("Analysis finished without an image, discarding");
                    self.phase = Phase::Idle;
                    self.quote_ticker = None;
                }
            }
        }

        if self.quote_ticker.as_mut().is_some_and(|t| t.poll(now)) {
            self.quote = Some(self.pick(ANALYSIS_QUOTES));
        }
        if self.massage_ticker.as_mut().is_some_and(|t| t.poll(now)) {
            self.quote = Some(self.pick(MASSAGE_QUOTES));
        }
    }

    fn complete_analysis(&mut self, size: ContainerSize) {
        for kind in LayerKind::ALL {
            let labels = kind.labels();
            let points = labels
                .iter()
                .enumerate()
                .map(|(i, label)| {
                    let x = sample_x(&mut self.rng, size.width, self.edge_margin);
                    let y = band_center_y(i, labels.len(), size.height);
                    MarkerPoint::new(x, y, *label)
                })
                .collect();
            self.layers.replace(kind, points);
        }

        if log::log_enabled!(log::Level::Debug) {
            if let Ok(json) = serde_json::to_string(&self.layers) {
                log::debug!("Generated layers: {}", json);
            }
        }

        self.phase = Phase::Complete;
        self.active_layer = LayerKind::Surface;
        self.notices.push(Notice::AnalysisComplete);
        log::info!(
            "Analysis complete for {}x{} container",
            size.width,
            size.height
        );
    }

    // ---- modes ----

    /// Switch edit mode on or off. Turning it on leaves massage mode.
    pub fn toggle_editing(&mut self, now: f64) {
        if !self.is_complete() {
            return;
        }
        match self.mode {
            Mode::Editing => {
                self.mode = Mode::Viewing;
                self.start_quote_ticker(now);
                log::info!("Edit mode off");
            }
            Mode::Massaging(_) | Mode::Viewing => {
                self.leave_massage();
                self.quote_ticker = None;
                self.mode = Mode::Editing;
                log::info!("Edit mode on");
            }
        }
    }

    /// Switch massage mode on or off. Turning it on leaves edit mode.
    pub fn toggle_massage(&mut self, now: f64) {
        if !self.is_complete() {
            return;
        }
        match self.mode {
            Mode::Massaging(_) => {
                self.leave_massage();
                self.mode = Mode::Viewing;
                self.start_quote_ticker(now);
                log::info!("Massage mode off");
            }
            Mode::Editing | Mode::Viewing => {
                self.quote_ticker = None;
                self.mode = Mode::Massaging(Round::Waiting);
                self.active_layer = LayerKind::Massage;
                log::info!("Massage mode on");
            }
        }
    }

    /// Select the displayed layer. The massage layer is only available in massage mode.
    pub fn select_layer(&mut self, kind: LayerKind) -> bool {
        if kind == LayerKind::Massage && !self.is_massaging() {
            return false;
        }
        self.active_layer = kind;
        true
    }

    fn leave_massage(&mut self) {
        if !self.is_massaging() {
            return;
        }
        for point in self.layers.get_mut(LayerKind::Massage) {
            point.is_found = false;
        }
        self.massage_ticker = None;
        self.active_layer = LayerKind::Surface;
    }

    fn start_quote_ticker(&mut self, now: f64) {
        self.quote = Some(self.pick(ANALYSIS_QUOTES));
        self.quote_ticker = Some(RepeatingTask::start(now, self.quote_interval));
    }

    // ---- edit and massage actions ----

    /// Move a point of the active layer to an already clamped position. Edit mode only.
    pub fn correct_point(&mut self, index: usize, x: f32, y: f32) -> bool {
        if !self.is_editing() {
            return false;
        }
        let Some(point) = self.layers.get_mut(self.active_layer).get_mut(index) else {
            return false;
        };
        point.move_to(x, y);
        let label = point.label.clone();

        log::info!("Corrected {} to ({:.0}, {:.0})", label, x, y);
        self.quote = Some(self.pick(CORRECTION_QUOTES));
        self.notices.push(Notice::PointCorrected { label });
        true
    }

    /// Reset every massage point and start counting.
    pub fn start_round(&mut self, now: f64) -> bool {
        if !self.is_massaging() {
            return false;
        }
        for point in self.layers.get_mut(LayerKind::Massage) {
            point.is_found = false;
        }
        self.mode = Mode::Massaging(Round::Running);
        self.massage_ticker = Some(RepeatingTask::start(now, self.massage_quote_interval));
        log::info!("Massage round started with {} points", self.massage_total());
        true
    }

    /// Mark a massage point found. Ignored unless a round is running or if already found.
    pub fn activate_point(&mut self, index: usize) -> bool {
        if self.mode != Mode::Massaging(Round::Running) {
            return false;
        }
        let Some(point) = self.layers.get_mut(LayerKind::Massage).get_mut(index) else {
            return false;
        };
        if point.is_found {
            return false;
        }
        point.is_found = true;
        let label = point.label.clone();

        self.quote = Some(self.pick(MASSAGE_QUOTES));
        log::info!(
            "Activated {} ({}/{})",
            label,
            self.massage_score(),
            self.massage_total()
        );
        self.notices.push(Notice::PointActivated { label });

        if self.massage_score() == self.massage_total() {
            self.mode = Mode::Massaging(Round::Ended);
            self.massage_ticker = None;
            self.notices.push(Notice::RoundComplete {
                total: self.massage_total(),
            });
            log::info!("Massage round complete");
        }
        true
    }

    fn pick(&mut self, pool: &'static [&'static str]) -> &'static str {
        pool[self.rng.random_range(0..pool.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::geometry::band_bounds;
    use rand::SeedableRng;

    const CONTAINER: ContainerSize = ContainerSize {
        width: 400.0,
        height: 600.0,
    };

    fn image() -> SessionImage {
        SessionImage {
            name: "knight.png".to_string(),
            width: 400,
            height: 600,
        }
    }

    fn new_session(seed: u64) -> Session {
        Session::new(&AppConfig::default(), StdRng::seed_from_u64(seed))
    }

    /// A session whose analysis has completed at t = 10.
    fn analyzed_session(seed: u64) -> Session {
        let mut session = new_session(seed);
        session.upload_image(image());
        session.set_features("tall elf, long cloak");
        assert!(session.analyze(0.0));
        session.tick(10.0);
        assert!(session.is_complete());
        session
    }

    fn massage_round(seed: u64) -> Session {
        let mut session = analyzed_session(seed);
        session.toggle_massage(11.0);
        assert!(session.start_round(11.0));
        session
    }

    fn assert_score_matches_found(session: &Session) {
        let found = session
            .layers()
            .get(LayerKind::Massage)
            .iter()
            .filter(|p| p.is_found)
            .count();
        assert_eq!(session.massage_score(), found);
    }

    #[test]
    fn test_analysis_requires_image_and_features() {
        let mut session = new_session(1);
        assert!(!session.analyze(0.0));

        session.set_features("broad shoulders");
        assert!(!session.analyze(0.0));

        let mut session = new_session(1);
        session.upload_image(image());
        session.set_features("   \n\t");
        assert!(!session.can_analyze());
        assert!(!session.analyze(0.0));
        assert_eq!(*session.phase(), Phase::Idle);
    }

    #[test]
    fn test_analysis_populates_all_layers() {
        let mut session = new_session(3);
        session.upload_image(image());
        session.set_features("stocky dwarf");
        assert!(session.analyze(0.0));
        assert!(session.is_analyzing());
        assert!(!session.analyze(0.5), "second request while running is ignored");

        // Tools step every 1.5s
        assert_eq!(session.current_tool(0.1), Some(ANALYSIS_TOOLS[0]));
        assert_eq!(session.current_tool(1.6), Some(ANALYSIS_TOOLS[1]));

        let finish = 1.5 * ANALYSIS_TOOLS.len() as f64;
        session.tick(finish - 0.01);
        assert!(session.layers().is_empty());

        session.tick(finish);
        assert!(session.is_complete());
        assert_eq!(session.current_tool(finish), None);
        assert_eq!(session.layers().get(LayerKind::Surface).len(), 6);
        assert_eq!(session.layers().get(LayerKind::Internal).len(), 5);
        assert_eq!(session.layers().get(LayerKind::Skeletal).len(), 5);
        assert_eq!(session.layers().get(LayerKind::Massage).len(), 5);
        assert_eq!(session.active_layer(), LayerKind::Surface);
        assert_eq!(session.drain_notices(), vec![Notice::AnalysisComplete]);
    }

    #[test]
    fn test_generated_points_stay_in_bands_and_margins() {
        for seed in 0..20 {
            let session = analyzed_session(seed);
            for kind in LayerKind::ALL {
                let points = session.layers().get(kind);
                for (i, (point, label)) in points.iter().zip(kind.labels()).enumerate() {
                    let (top, bottom) = band_bounds(i, points.len(), CONTAINER.height);
                    assert!(point.y > top && point.y < bottom);
                    assert!(point.x >= 40.0 && point.x < CONTAINER.width - 40.0);
                    assert_eq!(point.label, *label);
                    assert!(!point.is_found);
                }
            }
        }
    }

    #[test]
    fn test_generation_uses_image_pixels() {
        let mut session = new_session(4);
        session.upload_image(SessionImage {
            name: "giant.png".to_string(),
            width: 800,
            height: 1200,
        });
        session.set_features("giant");
        session.analyze(0.0);
        session.tick(100.0);

        assert_eq!(session.container(), Some(ContainerSize::new(800.0, 1200.0)));
        let feet = session.layers().get(LayerKind::Massage)[4].clone();
        let (top, bottom) = band_bounds(4, 5, 1200.0);
        assert!(feet.y > top && feet.y < bottom);
        assert!(feet.x >= 40.0 && feet.x < 760.0);
    }

    #[test]
    fn test_upload_clears_layers_and_modes() {
        let mut session = massage_round(5);
        session.activate_point(0);

        session.upload_image(image());
        assert!(session.layers().is_empty());
        assert_eq!(session.mode(), Mode::Viewing);
        assert_eq!(session.massage_score(), 0);
        assert_eq!(*session.phase(), Phase::Idle);
        assert_eq!(session.next_deadline(20.0), None);
    }

    #[test]
    fn test_upload_during_analysis_cancels_it() {
        let mut session = new_session(6);
        session.upload_image(image());
        session.set_features("wizard");
        session.analyze(0.0);

        session.upload_image(image());
        session.tick(30.0);
        assert_eq!(*session.phase(), Phase::Idle);
        assert!(session.layers().is_empty());
        assert!(session.can_analyze());
    }

    #[test]
    fn test_modes_are_exclusive() {
        let mut session = analyzed_session(7);

        session.toggle_massage(11.0);
        assert!(session.is_massaging());
        assert_eq!(session.active_layer(), LayerKind::Massage);

        session.toggle_editing(12.0);
        assert!(session.is_editing());
        assert!(!session.is_massaging());
        assert_eq!(session.active_layer(), LayerKind::Surface);

        session.toggle_massage(13.0);
        assert!(session.is_massaging());
        assert!(!session.is_editing());

        session.toggle_massage(14.0);
        assert_eq!(session.mode(), Mode::Viewing);
        assert_eq!(session.active_layer(), LayerKind::Surface);
    }

    #[test]
    fn test_modes_need_completed_analysis() {
        let mut session = new_session(8);
        session.upload_image(image());
        session.toggle_editing(0.0);
        session.toggle_massage(0.0);
        assert_eq!(session.mode(), Mode::Viewing);
    }

    #[test]
    fn test_massage_layer_selectable_only_in_massage_mode() {
        let mut session = analyzed_session(9);
        assert!(!session.select_layer(LayerKind::Massage));
        assert!(session.select_layer(LayerKind::Skeletal));
        assert_eq!(session.active_points().len(), 5);

        session.toggle_massage(11.0);
        assert!(session.select_layer(LayerKind::Massage));
    }

    #[test]
    fn test_correct_point_moves_only_in_edit_mode() {
        let mut session = analyzed_session(10);
        assert!(!session.correct_point(0, 5.0, 6.0));

        session.toggle_editing(11.0);
        session.select_layer(LayerKind::Internal);
        let before = session.active_points()[1].clone();
        assert!(session.correct_point(1, 400.0, 0.0));

        let after = &session.active_points()[1];
        assert_eq!((after.x, after.y), (400.0, 0.0));
        assert_eq!(after.label, before.label);
        assert_eq!(after.is_editing, before.is_editing);
        assert!(CORRECTION_QUOTES.contains(&session.quote().unwrap()));
        assert!(session
            .drain_notices()
            .contains(&Notice::PointCorrected { label: before.label }));

        assert!(!session.correct_point(99, 1.0, 1.0));
    }

    #[test]
    fn test_activation_requires_running_round() {
        let mut session = analyzed_session(11);
        session.toggle_massage(11.0);
        assert!(!session.activate_point(0));
        assert_eq!(session.massage_score(), 0);
    }

    #[test]
    fn test_full_round_in_any_order() {
        let mut session = massage_round(12);
        session.drain_notices();

        for (n, index) in [3, 0, 4, 1].into_iter().enumerate() {
            assert!(session.activate_point(index));
            assert_eq!(session.massage_score(), n + 1);
            assert_score_matches_found(&session);
        }
        assert_eq!(session.round(), Some(Round::Running));
        assert!(!session
            .drain_notices()
            .iter()
            .any(|n| matches!(n, Notice::RoundComplete { .. })));

        // Repeat clicks do not count
        assert!(!session.activate_point(3));
        assert_eq!(session.massage_score(), 4);

        assert!(session.activate_point(2));
        assert_eq!(session.massage_score(), 5);
        assert_eq!(session.round(), Some(Round::Ended));
        assert!(session
            .drain_notices()
            .contains(&Notice::RoundComplete { total: 5 }));

        // Round over: clicks are ignored
        assert!(!session.activate_point(0));
        assert_eq!(session.massage_score(), 5);
        assert_score_matches_found(&session);
    }

    #[test]
    fn test_start_round_resets_progress() {
        let mut session = massage_round(13);
        session.activate_point(1);
        session.activate_point(2);

        assert!(session.start_round(20.0));
        assert_eq!(session.massage_score(), 0);
        assert!(session
            .layers()
            .get(LayerKind::Massage)
            .iter()
            .all(|p| !p.is_found));

        for index in 0..5 {
            session.activate_point(index);
        }
        assert_eq!(session.round(), Some(Round::Ended));
        assert!(session.start_round(30.0));
        assert_eq!(session.massage_score(), 0);
        assert_eq!(session.round(), Some(Round::Running));
    }

    #[test]
    fn test_leaving_massage_mode_resets_score() {
        let mut session = massage_round(14);
        session.activate_point(0);
        session.activate_point(1);

        session.toggle_massage(15.0);
        assert_eq!(session.massage_score(), 0);
        assert_score_matches_found(&session);
        assert_eq!(session.active_layer(), LayerKind::Surface);
        assert_eq!(session.round(), None);
    }

    #[test]
    fn test_quote_tickers_follow_modes() {
        let mut session = analyzed_session(15);
        // Analysis ticker armed at t = 0, then every 5s
        assert!(session.quote().is_some());
        assert_eq!(session.next_deadline(10.5), Some(15.0));

        session.toggle_editing(11.0);
        assert_eq!(session.next_deadline(11.0), None, "no timer in edit mode");
        let quote = session.quote();
        session.tick(60.0);
        assert_eq!(session.quote(), quote);

        session.toggle_editing(61.0);
        assert_eq!(session.next_deadline(61.0), Some(66.0));

        session.toggle_massage(62.0);
        assert_eq!(session.next_deadline(62.0), None, "no timer until a round runs");

        session.start_round(70.0);
        assert_eq!(session.next_deadline(70.0), Some(74.0));
        session.tick(74.0);
        assert!(MASSAGE_QUOTES.contains(&session.quote().unwrap()));

        for index in 0..5 {
            session.activate_point(index);
        }
        assert_eq!(session.next_deadline(75.0), None, "round over stops the timer");
    }

    #[test]
    fn test_reanalysis_regenerates_layers() {
        let mut session = analyzed_session(16);
        session.toggle_editing(11.0);
        session.correct_point(0, 0.0, 0.0);

        assert!(session.analyze(20.0));
        assert_eq!(session.mode(), Mode::Viewing);
        assert!(session.layers().is_empty());
        session.tick(40.0);

        let head = &session.layers().get(LayerKind::Surface)[0];
        assert!(head.x >= 40.0);
        assert_eq!(head.y, 50.0);
    }
}
