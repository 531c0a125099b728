use std::fmt;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::render::{GeometryBackend, GeometryHandle, LabelHandle, LineHandle, Transition};

/// Identifies one chart instance among those sharing an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ChartId(pub u64);

/// Separator identity.
///
/// Two passes refer to "the same" separator when their values agree to six
/// significant digits, which absorbs the float jitter of recomputed steps.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeparatorKey(String);

impl SeparatorKey {
    #[must_use]
    pub fn for_value(value: f64) -> Self {
        let value = if value == 0.0 { 0.0 } else { value };
        Self(format!("{value:.5e}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SeparatorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeparatorState {
    Active,
    /// Absent from the latest pass; opacity animating to zero.
    FadingOut,
}

/// How a geometry update interacts with its transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum UpdateMode {
    /// Animate towards the new properties at full opacity.
    Update,
    /// Jump to the new properties; hidden first when the chart already
    /// rendered once, so the following `Update` fades it in.
    UpdateAndComplete { has_previous_state: bool },
    /// Fade out and drop the geometry when the fade ends.
    UpdateAndRemove,
}

impl UpdateMode {
    pub(super) fn apply<B: GeometryBackend + ?Sized>(
        self,
        backend: &mut B,
        geometry: GeometryHandle,
    ) {
        match self {
            Self::Update => backend.set_opacity(geometry, 1.0),
            Self::UpdateAndComplete { has_previous_state } => {
                if has_previous_state {
                    backend.set_opacity(geometry, 0.0);
                }
                backend.complete_transition(geometry);
            }
            Self::UpdateAndRemove => {
                backend.set_opacity(geometry, 0.0);
                backend.remove_on_completed(geometry);
            }
        }
    }
}

/// Geometry owned by one separator value of one axis on one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualSeparator {
    pub key: SeparatorKey,
    pub value: f64,
    pub is_labeled: bool,
    pub state: SeparatorState,
    pub line: Option<LineHandle>,
    pub tick: Option<LineHandle>,
    pub label: Option<LabelHandle>,
    pub subseparators: SmallVec<[LineHandle; 4]>,
    pub subticks: SmallVec<[LineHandle; 4]>,
}

impl VisualSeparator {
    #[must_use]
    pub fn new(key: SeparatorKey, value: f64, is_labeled: bool) -> Self {
        Self {
            key,
            value,
            is_labeled,
            state: SeparatorState::Active,
            line: None,
            tick: None,
            label: None,
            subseparators: SmallVec::new(),
            subticks: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn has_geometry(&self) -> bool {
        self.line.is_some()
            || self.tick.is_some()
            || self.label.is_some()
            || !self.subseparators.is_empty()
            || !self.subticks.is_empty()
    }

    pub fn geometries(&self) -> impl Iterator<Item = GeometryHandle> + '_ {
        self.line
            .into_iter()
            .chain(self.tick)
            .map(GeometryHandle::from)
            .chain(self.label.map(GeometryHandle::from))
            .chain(self.subseparators.iter().copied().map(GeometryHandle::from))
            .chain(self.subticks.iter().copied().map(GeometryHandle::from))
    }

    /// Starts the fade-out of every owned geometry.
    pub(super) fn fade_out<B: GeometryBackend + ?Sized>(&mut self, backend: &mut B) {
        for geometry in self.geometries().collect::<SmallVec<[GeometryHandle; 8]>>() {
            UpdateMode::UpdateAndRemove.apply(backend, geometry);
        }
        self.state = SeparatorState::FadingOut;
    }

    /// Releases every owned geometry right away and forgets the handles.
    pub(super) fn release<B: GeometryBackend + ?Sized>(&mut self, backend: &mut B) {
        for geometry in self.geometries().collect::<SmallVec<[GeometryHandle; 8]>>() {
            backend.release(geometry);
        }
        self.line = None;
        self.tick = None;
        self.label = None;
        self.subseparators.clear();
        self.subticks.clear();
    }

    pub(super) fn animate_all<B: GeometryBackend + ?Sized>(
        &self,
        backend: &mut B,
        transition: Transition,
    ) {
        for geometry in self.geometries() {
            backend.animate(geometry, transition);
        }
    }
}

/// Separators of one axis on one chart, in insertion order.
pub type SeparatorMap = IndexMap<SeparatorKey, VisualSeparator>;

/// Starts fading every active separator the latest pass did not measure.
pub(super) fn fade_unmeasured<B: GeometryBackend + ?Sized>(
    separators: &mut SeparatorMap,
    measured: &IndexSet<SeparatorKey>,
    backend: &mut B,
) -> usize {
    let mut faded = 0;
    for (key, separator) in separators.iter_mut() {
        if separator.state == SeparatorState::Active && !measured.contains(key) {
            separator.fade_out(backend);
            faded += 1;
        }
    }
    faded
}

/// Drops fading separators; their geometry was already flagged for removal.
pub(super) fn drop_faded(separators: &mut SeparatorMap) -> usize {
    let before = separators.len();
    separators.retain(|_, separator| separator.state != SeparatorState::FadingOut);
    before - separators.len()
}
