//! Loaded scenario: every satellite, vessel and validation hit
use hifitime::Epoch;
use itertools::Itertools;
use log::{debug, info, warn};
use std::collections::{BTreeMap, HashMap};

use crate::{
    cfg::Config,
    entity::{Entity, EntityId},
    hits::{HitCheck, ValidationHit},
    orbit::OrbitalElementRecord,
    prelude::{Error, GeodeticPoint},
    satellite::SatelliteTrack,
    track::{VesselReport, VesselTrack},
    visibility::{classify_all, Trackable, Visibility},
};

/// Peers in range of a reference entity
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// Reference entity
    pub reference: EntityId,
    /// `(peer id, peer name)` in range, sorted by name
    pub peers: Vec<(EntityId, String)>,
}

impl Summary {
    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let (empty, kind) = match self.reference {
            EntityId::Vessel(_) => ("No satellites in range", "Satellites"),
            EntityId::Satellite(_) => ("No vessels in range", "Vessels"),
            // hit markers have no peers
            EntityId::Hit(_) => ("No peers in range", "Peers"),
        };
        if self.peers.is_empty() {
            return write!(f, "{}", empty);
        }
        write!(
            f,
            "{} in range: {}",
            kind,
            self.peers.iter().map(|(_, name)| name).join(", ")
        )
    }
}

/// Read only scenario, built once from raw input rows.
#[derive(Debug)]
pub struct Scenario {
    cfg: Config,
    satellites: BTreeMap<String, SatelliteTrack>,
    vessels: BTreeMap<String, VesselTrack>,
    hits: Vec<ValidationHit>,
}

impl Scenario {
    /// Builds a new [Scenario]. Rows may come in any order. Malformed
    /// element sets and degenerate vessel tracks are dropped, with a warning.
    pub fn new(
        cfg: Config,
        elements: Vec<OrbitalElementRecord>,
        reports: Vec<VesselReport>,
        hits: Vec<ValidationHit>,
    ) -> Self {
        let elements = elements.into_iter().into_group_map_by(|r| r.object_id.clone());
        let reports = reports.into_iter().into_group_map_by(|r| r.vessel_id.clone());

        let mut satellites = BTreeMap::new();
        for (id, records) in elements.into_iter() {
            let track = SatelliteTrack::build(&id, &records, &cfg);
            if track.timeline().is_empty() {
                warn!("{}: no valid element set interval", id);
            }
            satellites.insert(id, track);
        }

        let mut vessels = BTreeMap::new();
        for (id, reports) in reports.into_iter() {
            match VesselTrack::from_reports(&reports) {
                Ok(track) => {
                    vessels.insert(id, track);
                },
                Err(e) => warn!("{}", e),
            }
        }

        info!(
            "scenario: {} satellite(s), {} vessel(s), {} validation hit(s)",
            satellites.len(),
            vessels.len(),
            hits.len()
        );

        Self {
            cfg,
            satellites,
            vessels,
            hits,
        }
    }
    /// [Config] applied to Self
    pub fn config(&self) -> &Config {
        &self.cfg
    }
    pub fn satellite(&self, id: &str) -> Option<&SatelliteTrack> {
        self.satellites.get(id)
    }
    pub fn vessel(&self, id: &str) -> Option<&VesselTrack> {
        self.vessels.get(id)
    }
    pub fn satellites(&self) -> impl Iterator<Item = &SatelliteTrack> {
        self.satellites.values()
    }
    pub fn vessels(&self) -> impl Iterator<Item = &VesselTrack> {
        self.vessels.values()
    }
    pub fn hits(&self) -> &[ValidationHit] {
        &self.hits
    }
    /// Resolves an [EntityId]
    pub fn entity(&self, id: &EntityId) -> Option<Entity<'_>> {
        match id {
            EntityId::Satellite(id) => self.satellites.get(id).map(Entity::Satellite),
            EntityId::Vessel(id) => self.vessels.get(id).map(Entity::Vessel),
            EntityId::Hit(index) => self.hits.get(*index).map(|hit| Entity::HitMarker(*index, hit)),
        }
    }
    /// Every entity of Self: satellites, then vessels, then hit markers
    pub fn entities(&self) -> impl Iterator<Item = Entity<'_>> {
        self.satellites
            .values()
            .map(Entity::Satellite)
            .chain(self.vessels.values().map(Entity::Vessel))
            .chain(
                self.hits
                    .iter()
                    .enumerate()
                    .map(|(index, hit)| Entity::HitMarker(index, hit)),
            )
    }
    /// Simulation clock bounds, from the earliest to the latest
    /// element set or vessel report instant.
    pub fn time_span(&self) -> Option<(Epoch, Epoch)> {
        let satellites = self.satellites.values().filter_map(|sat| sat.span());
        let vessels = self.vessels.values().map(|v| v.validity());
        satellites
            .chain(vessels)
            .flat_map(|(a, b)| [a, b])
            .minmax()
            .into_option()
    }
    /// Authoritative position of an entity at `t`.
    /// Hit markers are static and sit on the vessel position at detection instant.
    pub fn position_at(&self, id: &EntityId, t: Epoch) -> Result<GeodeticPoint, Error> {
        match self.entity(id) {
            Some(Entity::Satellite(sat)) => sat.position_at(t),
            Some(Entity::Vessel(vessel)) => vessel.position_at(t),
            Some(Entity::HitMarker(_, hit)) => {
                let vessel = self
                    .vessels
                    .get(&hit.vessel_id)
                    .ok_or_else(|| Error::UnknownEntity(hit.vessel_id.clone()))?;
                vessel.position_at(hit.epoch)
            },
            None => Err(Error::UnknownEntity(id.to_string())),
        }
    }
    /// Smoothed position of an entity at `t`, from render samples where available
    pub fn sampled_position_at(&self, id: &EntityId, t: Epoch) -> Result<GeodeticPoint, Error> {
        match id {
            EntityId::Satellite(sat) => self
                .satellites
                .get(sat)
                .ok_or_else(|| Error::UnknownEntity(id.to_string()))?
                .sampled_position_at(t),
            _ => self.position_at(id, t),
        }
    }
    /// Classifies every peer of the reference entity at `t`:
    /// satellites for a vessel, vessels for a satellite.
    /// Peers without a position at `t` are not part of the results.
    pub fn visibility_set(
        &self,
        reference: &EntityId,
        t: Epoch,
    ) -> Result<HashMap<EntityId, Visibility>, Error> {
        let range_km = self.cfg.visibility_range_km;
        match reference {
            EntityId::Vessel(_) => {
                let position = self.position_at(reference, t)?;
                let candidates = self
                    .satellites
                    .iter()
                    .map(|(id, sat)| (EntityId::Satellite(id.clone()), sat));
                Ok(classify_all(&position, candidates, t, range_km))
            },
            EntityId::Satellite(_) => {
                let position = self.position_at(reference, t)?;
                let candidates = self
                    .vessels
                    .iter()
                    .map(|(id, vessel)| (EntityId::Vessel(id.clone()), vessel));
                Ok(classify_all(&position, candidates, t, range_km))
            },
            EntityId::Hit(_) => {
                debug!("{} has no peers", reference);
                Ok(HashMap::new())
            },
        }
    }
    /// Builds the [Summary] of a classification
    pub(crate) fn summarize(
        &self,
        reference: &EntityId,
        classification: &HashMap<EntityId, Visibility>,
    ) -> Summary {
        let peers = classification
            .iter()
            .filter(|(_, visibility)| visibility.in_range())
            .filter_map(|(id, _)| self.entity(id))
            .map(|entity| (entity.id(), entity.name()))
            .sorted_by(|(id_a, name_a), (id_b, name_b)| name_a.cmp(name_b).then(id_a.cmp(id_b)))
            .collect();
        Summary {
            reference: reference.clone(),
            peers,
        }
    }
    /// Peers in range of the reference entity at `t`
    pub fn selection_summary(&self, reference: &EntityId, t: Epoch) -> Result<Summary, Error> {
        let classification = self.visibility_set(reference, t)?;
        Ok(self.summarize(reference, &classification))
    }
    /// Indices of the validation hits related to this entity
    pub fn hits_of(&self, id: &EntityId) -> Vec<usize> {
        self.hits
            .iter()
            .enumerate()
            .filter(|(_, hit)| match id {
                EntityId::Vessel(vessel) => hit.vessel_id == *vessel,
                EntityId::Satellite(sat) => hit.satellite_id == *sat,
                EntityId::Hit(_) => false,
            })
            .map(|(index, _)| index)
            .collect()
    }
    /// Cross checks every validation hit against the reconstructed geometry
    pub fn validate_hits(&self) -> Vec<(usize, HitCheck)> {
        self.hits
            .iter()
            .enumerate()
            .map(|(index, hit)| {
                let check = HitCheck::new(
                    hit,
                    self.satellites.get(&hit.satellite_id),
                    self.vessels.get(&hit.vessel_id),
                    self.cfg.visibility_range_km,
                );
                if check.plausible(hit) == Some(false) {
                    warn!(
                        "{:?} ({} / {}) - implausible detection",
                        hit.epoch, hit.vessel_id, hit.satellite_id
                    );
                }
                (index, check)
            })
            .collect()
    }
}
