//! Selection and highlight controller
use hifitime::Epoch;
use log::{debug, info};
use std::collections::{BTreeMap, BTreeSet};

use crate::{
    entity::EntityId,
    scenario::{Scenario, Summary},
};

/// Current selection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Idle,
    /// A vessel is selected
    ShipSelected(String),
    /// A satellite is selected
    SatelliteSelected(String),
}

impl Selection {
    /// Selected entity
    pub fn reference(&self) -> Option<EntityId> {
        match self {
            Self::Idle => None,
            Self::ShipSelected(id) => Some(EntityId::Vessel(id.clone())),
            Self::SatelliteSelected(id) => Some(EntityId::Satellite(id.clone())),
        }
    }
}

/// Highlight state of an entity
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Highlight {
    #[default]
    Default,
    InRange,
}

/// Highlight update, to be applied by the rendering front end
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightUpdate {
    /// Selection this update derives from
    pub selection: Selection,
    /// Instant of evaluation
    pub epoch: Epoch,
    /// Highlight state of every affected entity
    pub highlights: BTreeMap<EntityId, Highlight>,
    /// Summary to attach to the selected entity
    pub summary: Option<Summary>,
    /// Transient hit markers to display
    pub markers: Vec<EntityId>,
}

impl HighlightUpdate {
    /// Entities highlighted as [Highlight::InRange]
    pub fn in_range(&self) -> impl Iterator<Item = &EntityId> {
        self.highlights
            .iter()
            .filter_map(|(id, h)| if *h == Highlight::InRange { Some(id) } else { None })
    }
}

/// [SelectionController] reacts to pick events and clock ticks,
/// and produces [HighlightUpdate]s. It owns the selection state.
#[derive(Debug, Default)]
pub struct SelectionController {
    selection: Selection,
    /// Instant of latest visibility evaluation
    last_recompute: Option<Epoch>,
    /// Currently highlighted entities
    highlighted: BTreeSet<EntityId>,
}

impl SelectionController {
    /// Current [Selection]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }
    /// Entities currently highlighted as in range
    pub fn highlighted(&self) -> &BTreeSet<EntityId> {
        &self.highlighted
    }
    /// Handles a pick event at current simulated instant `t`.
    /// Picking a vessel or a satellite replaces the selection, anything
    /// else resets to [Selection::Idle]. Picking a hit marker is not a
    /// transition: returns None.
    pub fn on_pick(
        &mut self,
        scenario: &Scenario,
        pick: Option<EntityId>,
        t: Epoch,
    ) -> Option<HighlightUpdate> {
        let selection = match pick {
            Some(EntityId::Hit(index)) => {
                debug!("hit marker #{} picked: selection unchanged", index);
                return None;
            },
            Some(EntityId::Vessel(id)) if scenario.vessel(&id).is_some() => Selection::ShipSelected(id),
            Some(EntityId::Satellite(id)) if scenario.satellite(&id).is_some() => {
                Selection::SatelliteSelected(id)
            },
            Some(unknown) => {
                debug!("{} picked: unknown entity", unknown);
                Selection::Idle
            },
            None => Selection::Idle,
        };

        info!("{:?} - selection: {:?}", t, selection);
        self.selection = selection;

        match self.selection.reference() {
            Some(reference) => Some(self.recompute(scenario, &reference, t)),
            None => Some(self.reset(scenario, t)),
        }
    }
    /// Handles a simulation clock tick. Visibility is re-evaluated at most
    /// once per recompute period of simulated time, in either direction.
    pub fn on_clock_tick(&mut self, scenario: &Scenario, t: Epoch) -> Option<HighlightUpdate> {
        let reference = self.selection.reference()?;
        if let Some(last) = self.last_recompute {
            if (t - last).abs() < scenario.config().recompute_period {
                return None;
            }
        }
        Some(self.recompute(scenario, &reference, t))
    }
    /// Back to idle: every satellite and vessel returns to default
    fn reset(&mut self, scenario: &Scenario, t: Epoch) -> HighlightUpdate {
        self.last_recompute = None;
        self.highlighted.clear();

        let highlights = scenario
            .satellites()
            .map(|sat| EntityId::Satellite(sat.satellite_id.clone()))
            .chain(
                scenario
                    .vessels()
                    .map(|vessel| EntityId::Vessel(vessel.vessel_id.clone())),
            )
            .map(|id| (id, Highlight::Default))
            .collect();

        HighlightUpdate {
            selection: Selection::Idle,
            epoch: t,
            highlights,
            summary: None,
            markers: Vec::new(),
        }
    }
    /// Re-evaluates visibility of the selected entity at `t`
    fn recompute(&mut self, scenario: &Scenario, reference: &EntityId, t: Epoch) -> HighlightUpdate {
        self.last_recompute = Some(t);

        let peers = match reference {
            EntityId::Vessel(_) => scenario
                .satellites()
                .map(|sat| EntityId::Satellite(sat.satellite_id.clone()))
                .collect::<Vec<_>>(),
            _ => scenario
                .vessels()
                .map(|vessel| EntityId::Vessel(vessel.vessel_id.clone()))
                .collect::<Vec<_>>(),
        };

        let classification = match scenario.visibility_set(reference, t) {
            Ok(classification) => classification,
            Err(e) => {
                debug!("{:?} - {}", t, e);
                Default::default()
            },
        };

        let highlights = peers
            .into_iter()
            .map(|id| {
                let highlight = match classification.get(&id) {
                    Some(visibility) if visibility.in_range() => Highlight::InRange,
                    _ => Highlight::Default,
                };
                (id, highlight)
            })
            .collect::<BTreeMap<_, _>>();

        self.highlighted = highlights
            .iter()
            .filter_map(|(id, h)| {
                if *h == Highlight::InRange {
                    Some(id.clone())
                } else {
                    None
                }
            })
            .collect();

        let summary = scenario.summarize(reference, &classification);
        let markers = scenario
            .hits_of(reference)
            .into_iter()
            .map(EntityId::Hit)
            .collect();

        debug!(
            "{:?} - {}: {} in range",
            t,
            reference,
            self.highlighted.len()
        );

        HighlightUpdate {
            selection: self.selection.clone(),
            epoch: t,
            highlights,
            summary: Some(summary),
            markers,
        }
    }
}
