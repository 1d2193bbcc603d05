use super::{EnginePhase, RunMetadata, RunMetadataSink, TransportEngine};
use crate::error::{GeometryError, Result};
use crate::geom::builder::ConcentricGeometryBuilder;
use crate::geom::parameters::GeometryParameters;
use crate::geom::tree::ResolvedGeometry;
use crate::material::catalog::MaterialCatalog;
use crate::sd::{
    HitCollector, HitCollectorFactory, HitCounterFactory, SensitiveDetectors,
    SensitiveRegionBinder,
};
use anyhow::Context;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

/// Reference transport engine.
///
/// Holds the published geometry and the pending rebuild/refresh signals.
/// Events run in parallel against a single read-only snapshot, and the
/// snapshot can only be replaced while no events are running.
pub struct RunManager {
    phase: Mutex<EnginePhase>,
    geometry: RwLock<Option<Arc<ResolvedGeometry>>>,
    geometry_stale: AtomicBool,
    /// Physics tables are not built until the first initialization.
    tables_stale: AtomicBool,
    rebuild_requests: AtomicUsize,
    table_notifications: AtomicUsize,
    table_refreshes: AtomicUsize,
    events_processed: AtomicUsize,
    factory: Box<dyn HitCollectorFactory>,
    detectors: Mutex<SensitiveDetectors>,
    binder: Mutex<SensitiveRegionBinder>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Returns the engine to `Idle` when a run ends, including on panic.
struct EventLoopGuard<'a>(&'a RunManager);

impl Drop for EventLoopGuard<'_> {
    fn drop(&mut self) {
        self.0.end_event_processing();
    }
}

impl RunManager {
    pub fn new<F: HitCollectorFactory + 'static>(factory: F) -> Self {
        Self {
            phase: Mutex::new(EnginePhase::PreInit),
            geometry: RwLock::new(None),
            geometry_stale: AtomicBool::new(false),
            tables_stale: AtomicBool::new(true),
            rebuild_requests: AtomicUsize::new(0),
            table_notifications: AtomicUsize::new(0),
            table_refreshes: AtomicUsize::new(0),
            events_processed: AtomicUsize::new(0),
            factory: Box::new(factory),
            detectors: Mutex::new(SensitiveDetectors::new()),
            binder: Mutex::new(SensitiveRegionBinder::new()),
        }
    }

    /// Rebuilds the geometry if none exists or a rebuild was requested,
    /// binds the sensitive region and refreshes stale physics tables.
    ///
    /// On a build error the previously published geometry stays in place
    /// and the rebuild request stays pending.
    pub fn initialize(
        &self,
        params: &GeometryParameters,
        catalog: &MaterialCatalog,
        builder: &ConcentricGeometryBuilder,
    ) -> Result<Arc<ResolvedGeometry>> {
        let phase = self.phase();
        if !phase.accepts_edits() {
            return Err(GeometryError::CommandOutOfPhase {
                command: "initialize",
                phase,
            });
        }

        let geometry = match self.current_geometry() {
            Some(g) if !self.is_geometry_stale() => g,
            _ => {
                let built = builder.build(params, catalog).inspect_err(|e| {
                    log::error!("Geometry build failed: {}", e);
                })?;
                let built = Arc::new(built);
                self.install_geometry(Arc::clone(&built))?;
                self.geometry_stale.store(false, Ordering::SeqCst);
                built
            }
        };

        self.ensure_bound(&geometry)?;
        if self.are_material_tables_stale() {
            self.refresh_physics_tables();
        }
        self.set_phase(EnginePhase::Idle);
        Ok(geometry)
    }

    /// Enters the event loop and returns the snapshot events must use.
    pub fn begin_event_processing(&self) -> Result<Arc<ResolvedGeometry>> {
        let mut phase = lock(&self.phase);
        if !phase.accepts_edits() {
            return Err(GeometryError::CommandOutOfPhase {
                command: "beamOn",
                phase: *phase,
            });
        }
        let geometry = self.current_geometry().ok_or(GeometryError::NoGeometry)?;
        if self.is_geometry_stale() {
            return Err(GeometryError::StaleGeometry);
        }
        if self.are_material_tables_stale() {
            self.refresh_physics_tables();
        }
        self.ensure_bound(&geometry)?;

        log::debug!("Engine phase {} -> {}", *phase, EnginePhase::EventLoop);
        *phase = EnginePhase::EventLoop;
        Ok(geometry)
    }

    pub fn end_event_processing(&self) {
        let mut phase = lock(&self.phase);
        if *phase == EnginePhase::EventLoop {
            log::debug!("Engine phase {} -> {}", *phase, EnginePhase::Idle);
            *phase = EnginePhase::Idle;
        }
    }

    /// Runs `n_events` events in parallel on the current geometry.
    ///
    /// `event` receives the event index, the geometry snapshot and the
    /// collector bound to the sensitive region.
    pub fn beam_on<F>(&self, n_events: usize, event: F) -> Result<usize>
    where
        F: Fn(usize, &ResolvedGeometry, &dyn HitCollector) + Sync + Send,
    {
        let geometry = self.begin_event_processing()?;
        let _guard = EventLoopGuard(self);

        let collector = self.sensitive_collector().ok_or_else(|| {
            GeometryError::MissingVolume(lock(&self.binder).volume_name().to_string())
        })?;
        collector.reset();

        (0..n_events)
            .into_par_iter()
            .for_each(|i| event(i, &geometry, collector.as_ref()));

        self.events_processed.fetch_add(n_events, Ordering::SeqCst);
        log::info!(
            "Processed {} events on geometry {}, {} hits in '{}'",
            n_events,
            geometry.uid().short(),
            collector.hit_count(),
            collector.collection_name()
        );
        Ok(n_events)
    }

    /// Hands the detector dimensions to the sink.
    pub fn end_of_run(
        &self,
        params: &GeometryParameters,
        sink: &mut dyn RunMetadataSink,
    ) -> anyhow::Result<RunMetadata> {
        let metadata = RunMetadata::from_parameters(params);
        sink.fill_metadata(&metadata)
            .context("Failed to store run metadata")?;
        Ok(metadata)
    }

    /// Collector registered for the sensitive volume.
    pub fn sensitive_collector(&self) -> Option<Arc<dyn HitCollector>> {
        let binder = lock(&self.binder);
        lock(&self.detectors).collector_for(binder.volume_name())
    }

    pub fn is_geometry_stale(&self) -> bool {
        self.geometry_stale.load(Ordering::SeqCst)
    }

    pub fn are_material_tables_stale(&self) -> bool {
        self.tables_stale.load(Ordering::SeqCst)
    }

    pub fn rebuild_requests(&self) -> usize {
        self.rebuild_requests.load(Ordering::SeqCst)
    }

    pub fn material_table_notifications(&self) -> usize {
        self.table_notifications.load(Ordering::SeqCst)
    }

    pub fn physics_table_refreshes(&self) -> usize {
        self.table_refreshes.load(Ordering::SeqCst)
    }

    pub fn events_processed(&self) -> usize {
        self.events_processed.load(Ordering::SeqCst)
    }

    fn set_phase(&self, next: EnginePhase) {
        let mut phase = lock(&self.phase);
        if *phase != next {
            log::debug!("Engine phase {} -> {}", *phase, next);
            *phase = next;
        }
    }

    fn refresh_physics_tables(&self) {
        self.tables_stale.store(false, Ordering::SeqCst);
        let n = self.table_refreshes.fetch_add(1, Ordering::SeqCst) + 1;
        log::info!("Physics tables rebuilt (refresh #{})", n);
    }

    /// Binds the sensitive region once per geometry instance.
    fn ensure_bound(&self, geometry: &ResolvedGeometry) -> Result<()> {
        let mut binder = lock(&self.binder);
        if binder.is_bound(geometry.uid()) {
            return Ok(());
        }
        let mut detectors = lock(&self.detectors);
        binder.bind(geometry, self.factory.as_ref(), &mut *detectors)?;
        Ok(())
    }
}

impl Default for RunManager {
    fn default() -> Self {
        Self::new(HitCounterFactory::default())
    }
}

impl TransportEngine for RunManager {
    fn phase(&self) -> EnginePhase {
        *lock(&self.phase)
    }

    fn request_geometry_rebuild(&self) {
        self.geometry_stale.store(true, Ordering::SeqCst);
        self.rebuild_requests.fetch_add(1, Ordering::SeqCst);
        log::debug!("Geometry rebuild requested");
    }

    fn notify_material_tables_stale(&self) {
        self.tables_stale.store(true, Ordering::SeqCst);
        self.table_notifications.fetch_add(1, Ordering::SeqCst);
        log::debug!("Material tables marked stale");
    }

    fn current_geometry(&self) -> Option<Arc<ResolvedGeometry>> {
        self.geometry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn install_geometry(&self, geometry: Arc<ResolvedGeometry>) -> Result<()> {
        let phase = lock(&self.phase);
        if !phase.accepts_edits() {
            return Err(GeometryError::CommandOutOfPhase {
                command: "installGeometry",
                phase: *phase,
            });
        }
        log::debug!(
            "Installing geometry {} revision {}",
            geometry.uid().short(),
            geometry.revision()
        );
        *self.geometry.write().unwrap_or_else(PoisonError::into_inner) = Some(geometry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::volume::VolumeKind;
    use crate::sd::Hit;
    use crate::Point;

    fn initialized() -> (RunManager, GeometryParameters, MaterialCatalog) {
        let rm = RunManager::default();
        let params = GeometryParameters::default();
        let catalog = MaterialCatalog::new();
        rm.initialize(&params, &catalog, &ConcentricGeometryBuilder::new())
            .unwrap();
        (rm, params, catalog)
    }

    fn hit_target(event: usize, g: &ResolvedGeometry, sd: &dyn HitCollector) {
        let p = Point::new(0.0, 0.0, (event % 10) as f64);
        if g.locate(p).map(|v| v.kind) == Some(VolumeKind::Target) {
            sd.record(Hit {
                event,
                position: p,
                energy_deposit: 1.0,
            });
        }
    }

    #[test]
    fn test_initialize_builds_and_binds() {
        let (rm, _, _) = initialized();
        assert_eq!(rm.phase(), EnginePhase::Idle);
        assert!(rm.current_geometry().is_some());
        assert!(rm.sensitive_collector().is_some());
        assert_eq!(rm.physics_table_refreshes(), 1);
        assert!(!rm.are_material_tables_stale());
    }

    #[test]
    fn test_beam_on_records_hits() -> Result<()> {
        let (rm, _, _) = initialized();
        assert_eq!(rm.beam_on(50, hit_target)?, 50);
        assert_eq!(rm.sensitive_collector().unwrap().hit_count(), 50);
        assert_eq!(rm.events_processed(), 50);
        assert_eq!(rm.phase(), EnginePhase::Idle);
        Ok(())
    }

    #[test]
    fn test_no_events_without_geometry() {
        let rm = RunManager::default();
        assert_eq!(rm.beam_on(1, hit_target), Err(GeometryError::NoGeometry));
    }

    #[test]
    fn test_stale_geometry_blocks_events() -> Result<()> {
        let (rm, params, catalog) = initialized();
        let before = rm.current_geometry().unwrap();
        rm.request_geometry_rebuild();
        assert_eq!(rm.beam_on(1, hit_target), Err(GeometryError::StaleGeometry));

        let after = rm.initialize(&params, &catalog, &ConcentricGeometryBuilder::new())?;
        assert_ne!(before.uid(), after.uid());
        assert!(!rm.is_geometry_stale());
        assert_eq!(rm.beam_on(1, hit_target)?, 1);
        Ok(())
    }

    #[test]
    fn test_failed_rebuild_keeps_previous_geometry() {
        let (rm, mut params, catalog) = initialized();
        let before = rm.current_geometry().unwrap();
        params.world_material = "unobtainium".to_string();
        rm.request_geometry_rebuild();

        let res = rm.initialize(&params, &catalog, &ConcentricGeometryBuilder::new());
        assert_eq!(
            res.unwrap_err(),
            GeometryError::UnresolvedMaterial("unobtainium".to_string())
        );
        assert_eq!(rm.current_geometry().unwrap().uid(), before.uid());
        assert!(rm.is_geometry_stale());
    }

    #[test]
    fn test_install_rejected_during_events() -> Result<()> {
        let (rm, _, _) = initialized();
        let g = rm.begin_event_processing()?;
        assert_eq!(rm.phase(), EnginePhase::EventLoop);
        assert!(matches!(
            rm.install_geometry(Arc::clone(&g)),
            Err(GeometryError::CommandOutOfPhase { .. })
        ));
        rm.end_event_processing();
        rm.install_geometry(g)?;
        Ok(())
    }

    #[test]
    fn test_material_swap_keeps_binding() -> Result<()> {
        let (rm, _, catalog) = initialized();
        let collector = rm.sensitive_collector().unwrap();
        let g = rm.current_geometry().unwrap();

        let swapped = g.with_material(VolumeKind::Target, catalog.resolve("G4_lXe")?);
        rm.install_geometry(Arc::new(swapped))?;
        rm.notify_material_tables_stale();
        rm.beam_on(5, hit_target)?;

        assert!(Arc::ptr_eq(&collector, &rm.sensitive_collector().unwrap()));
        assert_eq!(rm.physics_table_refreshes(), 2);
        assert_eq!(rm.current_geometry().unwrap().revision(), 1);
        Ok(())
    }

    #[test]
    fn test_end_of_run_fills_sink() -> anyhow::Result<()> {
        let (rm, params, _) = initialized();
        let mut sink: Vec<RunMetadata> = Vec::new();
        let meta = rm.end_of_run(&params, &mut sink)?;
        assert_eq!(sink, vec![meta]);
        assert_eq!(meta.target_length, params.target_length);
        Ok(())
    }
}
