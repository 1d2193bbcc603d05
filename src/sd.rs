//! Sensitive region binding.
//!
//! The hit-collecting capability belongs to the transport engine. This
//! module only attaches one collector to the target volume of a freshly
//! built geometry and registers it with the engine's detector registry.

use crate::error::{GeometryError, Result};
use crate::geom::tree::ResolvedGeometry;
use crate::geom::volume::VolumeKind;
use crate::{Point, UID};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

/// Energy deposit recorded in a sensitive volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub event: usize,
    pub position: Point,
    /// Deposited energy in MeV.
    pub energy_deposit: f64,
}

/// Hit collection capability supplied by the transport engine.
///
/// Collectors are shared by all event workers, so recording takes `&self`.
pub trait HitCollector: Send + Sync {
    /// Detector name, e.g. `/G4QPIX/TRACKING`.
    fn name(&self) -> &str;

    fn collection_name(&self) -> &str;

    fn record(&self, hit: Hit);

    fn hit_count(&self) -> usize;

    /// Clears recorded hits at the start of a run.
    fn reset(&self) {}
}

/// Constructs hit collectors on demand.
pub trait HitCollectorFactory: Send + Sync {
    fn create(&self) -> Arc<dyn HitCollector>;
}

/// Engine-side table of sensitive volumes.
pub trait DetectorRegistry {
    fn register(&mut self, volume: &str, collector: Arc<dyn HitCollector>);
}

/// Collectors keyed by logical volume name.
#[derive(Default)]
pub struct SensitiveDetectors {
    by_volume: HashMap<String, Arc<dyn HitCollector>>,
}

impl SensitiveDetectors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collector_for(&self, volume: &str) -> Option<Arc<dyn HitCollector>> {
        self.by_volume.get(volume).cloned()
    }

    pub fn len(&self) -> usize {
        self.by_volume.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_volume.is_empty()
    }
}

impl DetectorRegistry for SensitiveDetectors {
    fn register(&mut self, volume: &str, collector: Arc<dyn HitCollector>) {
        if self
            .by_volume
            .insert(volume.to_string(), collector)
            .is_some()
        {
            log::debug!("Replacing sensitive detector of volume '{}'", volume);
        }
    }
}

/// Result of a successful bind.
#[derive(Clone)]
pub struct BoundRegion {
    pub geometry: UID,
    pub volume: String,
    pub collector: Arc<dyn HitCollector>,
}

impl fmt::Debug for BoundRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundRegion")
            .field("geometry", &self.geometry)
            .field("volume", &self.volume)
            .field("collector", &self.collector.name())
            .finish()
    }
}

/// Binds hit collection to exactly one logical volume per geometry instance.
///
/// Only the most recently bound geometry is remembered.
#[derive(Debug, Clone)]
pub struct SensitiveRegionBinder {
    volume_name: String,
    bound: Option<UID>,
}

impl SensitiveRegionBinder {
    /// Binder for the target volume.
    pub fn new() -> Self {
        Self::for_volume(VolumeKind::Target.name())
    }

    pub fn for_volume(name: &str) -> Self {
        Self {
            volume_name: name.to_string(),
            bound: None,
        }
    }

    pub fn volume_name(&self) -> &str {
        &self.volume_name
    }

    pub fn is_bound(&self, geometry: &UID) -> bool {
        self.bound.as_ref() == Some(geometry)
    }

    /// Creates a collector and registers it against the sensitive volume.
    ///
    /// Fails with `DoubleBind` if this geometry instance was already bound.
    pub fn bind<F, R>(
        &mut self,
        geometry: &ResolvedGeometry,
        factory: &F,
        registry: &mut R,
    ) -> Result<BoundRegion>
    where
        F: HitCollectorFactory + ?Sized,
        R: DetectorRegistry + ?Sized,
    {
        if self.is_bound(geometry.uid()) {
            return Err(GeometryError::DoubleBind {
                geometry: geometry.uid().clone(),
                volume: self.volume_name.clone(),
            });
        }
        let volume = geometry
            .volume(&self.volume_name)
            .ok_or_else(|| GeometryError::MissingVolume(self.volume_name.clone()))?;

        let collector = factory.create();
        registry.register(&volume.name, Arc::clone(&collector));
        self.bound = Some(geometry.uid().clone());
        log::info!(
            "Sensitive detector '{}' bound to '{}' (geometry {})",
            collector.name(),
            volume.name,
            geometry.uid().short()
        );

        Ok(BoundRegion {
            geometry: geometry.uid().clone(),
            volume: volume.name.clone(),
            collector,
        })
    }
}

impl Default for SensitiveRegionBinder {
    fn default() -> Self {
        Self::new()
    }
}

/// Collector that keeps every hit in memory.
pub struct HitCounter {
    name: String,
    collection_name: String,
    hits: Mutex<Vec<Hit>>,
}

impl HitCounter {
    pub fn new(name: &str, collection_name: &str) -> Self {
        Self {
            name: name.to_string(),
            collection_name: collection_name.to_string(),
            hits: Mutex::new(Vec::new()),
        }
    }

    pub fn hits(&self) -> Vec<Hit> {
        self.hits.lock().map(|h| h.clone()).unwrap_or_default()
    }

    /// Sum of energy deposits in MeV.
    pub fn total_energy(&self) -> f64 {
        self.hits
            .lock()
            .map(|h| h.iter().map(|hit| hit.energy_deposit).sum::<f64>())
            .unwrap_or(0.0)
    }
}

impl HitCollector for HitCounter {
    fn name(&self) -> &str {
        &self.name
    }

    fn collection_name(&self) -> &str {
        &self.collection_name
    }

    fn record(&self, hit: Hit) {
        match self.hits.lock() {
            Ok(mut hits) => hits.push(hit),
            Err(_) => log::error!("Hit collection '{}' is poisoned", self.collection_name),
        }
    }

    fn hit_count(&self) -> usize {
        self.hits.lock().map(|h| h.len()).unwrap_or(0)
    }

    fn reset(&self) {
        if let Ok(mut hits) = self.hits.lock() {
            hits.clear();
        }
    }
}

/// Produces [`HitCounter`] collectors.
#[derive(Debug, Clone)]
pub struct HitCounterFactory {
    pub name: String,
    pub collection_name: String,
}

impl Default for HitCounterFactory {
    fn default() -> Self {
        Self {
            name: "/G4QPIX/TRACKING".to_string(),
            collection_name: "TrackingHitsCollection".to_string(),
        }
    }
}

impl HitCollectorFactory for HitCounterFactory {
    fn create(&self) -> Arc<dyn HitCollector> {
        Arc::new(HitCounter::new(&self.name, &self.collection_name))
    }
}
