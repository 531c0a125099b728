use serde::{Deserialize, Serialize};

/// Paint layers a geometry can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CanvasLayerKind {
    Subseparators,
    Separators,
    Diagonals,
    DiagonalLabels,
    Subticks,
    Ticks,
    AxisLabels,
    AxisNames,
    Title,
    Crosshair,
    CrosshairLabels,
}

impl CanvasLayerKind {
    /// Layers whose geometry belongs inside the draw margin.
    #[must_use]
    pub fn is_plot_area(self) -> bool {
        matches!(
            self,
            Self::Subseparators | Self::Separators | Self::Diagonals | Self::DiagonalLabels
                | Self::Crosshair
        )
    }
}

/// Back-to-front paint order used when a scene is flattened into a frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerStack {
    pub layers: Vec<CanvasLayerKind>,
}

impl Default for LayerStack {
    fn default() -> Self {
        Self::canonical()
    }
}

impl LayerStack {
    #[must_use]
    pub fn canonical() -> Self {
        Self {
            layers: vec![
                CanvasLayerKind::Subseparators,
                CanvasLayerKind::Separators,
                CanvasLayerKind::Diagonals,
                CanvasLayerKind::DiagonalLabels,
                CanvasLayerKind::Subticks,
                CanvasLayerKind::Ticks,
                CanvasLayerKind::AxisLabels,
                CanvasLayerKind::AxisNames,
                CanvasLayerKind::Title,
                CanvasLayerKind::Crosshair,
                CanvasLayerKind::CrosshairLabels,
            ],
        }
    }

    #[must_use]
    pub fn position(&self, layer: CanvasLayerKind) -> usize {
        self.layers
            .iter()
            .position(|candidate| *candidate == layer)
            .unwrap_or(self.layers.len())
    }
}

#[cfg(test)]
mod tests {
    use super::{CanvasLayerKind, LayerStack};

    #[test]
    fn grid_paints_below_diagonals_and_crosshair_on_top() {
        let stack = LayerStack::canonical();
        assert!(
            stack.position(CanvasLayerKind::Separators) < stack.position(CanvasLayerKind::Diagonals)
        );
        assert_eq!(
            stack.layers.last().copied(),
            Some(CanvasLayerKind::CrosshairLabels)
        );
    }
}
