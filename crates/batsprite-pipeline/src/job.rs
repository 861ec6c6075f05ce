// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The render-job state machine.
//!
//! A job walks night-mode x zoom x rotation combinations in a fixed order,
//! one step at a time. Each step exports sliced geometry, then hands off to
//! the host renderer and waits; the finished raster arrives through
//! [`RenderJob::raster_ready`], which tiles and saves it before the next
//! step begins. Steps never overlap, and cancellation is honoured only at
//! step boundaries, so a delivered raster is always fully exported.

use std::collections::BTreeMap;
use std::path::PathBuf;

use batsprite_core::{fitter, ids, rig, slicer, Canvas, Mesh, MeshSlice, NightMode, Rotation, Zoom};
use log::{debug, info};

use crate::config::JobConfig;
use crate::error::PipelineError;
use crate::export;
use crate::host::{Raster, RenderHost};
use crate::raster;
use crate::tools::Fshgen;

/// Where a render job currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    /// Created but not started.
    Idle,
    /// Running a step's pre-phase (fit, slice, export geometry).
    Rendering,
    /// Waiting for the host renderer to deliver the step's raster.
    AwaitingRaster,
    /// Running a step's post-phase (tile, save images).
    Exporting,
    /// All steps finished.
    Done,
    /// Stopped at a step boundary after [`RenderJob::cancel`].
    Cancelled,
    /// A step failed; see the returned error.
    Failed,
}

/// One unit of work: a single night-mode, zoom and rotation combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Lighting variant.
    pub night: NightMode,
    /// Zoom level.
    pub zoom: Zoom,
    /// Compass rotation.
    pub rotation: Rotation,
}

#[derive(Debug)]
struct PendingRaster {
    canvas: Canvas,
    nonempty_tiles: Vec<(u32, u32)>,
}

/// Drives a full sprite-sheet render over a model.
#[derive(Debug)]
pub struct RenderJob<H: RenderHost> {
    config: JobConfig,
    model: Mesh,
    host: H,
    steps: Vec<Step>,
    current: usize,
    state: JobState,
    cancel_requested: bool,
    emitted: Vec<PathBuf>,
    pending: Option<PendingRaster>,
}

impl<H: RenderHost> RenderJob<H> {
    /// Creates a job over a world-space model mesh.
    ///
    /// # Errors
    ///
    /// [`PipelineError::ConflictingNightModes`] if two configured night
    /// modes share the instance-id night flag. Filenames carry only that
    /// flag, so such modes would overwrite each other's outputs; both night
    /// variants (and duplicates) must run as separate jobs.
    pub fn new(config: JobConfig, model: Mesh, host: H) -> Result<Self, PipelineError> {
        let mut seen: [Option<NightMode>; 2] = [None, None];
        for &night in &config.night_modes {
            let slot = &mut seen[night.is_night() as usize];
            if let Some(prev) = *slot {
                return Err(PipelineError::ConflictingNightModes {
                    first: prev.label(),
                    second: night.label(),
                });
            }
            *slot = Some(night);
        }
        let mut steps = Vec::new();
        for &night in &config.night_modes {
            for zoom in Zoom::ALL {
                for rotation in Rotation::ALL {
                    steps.push(Step {
                        night,
                        zoom,
                        rotation,
                    });
                }
            }
        }
        Ok(Self {
            config,
            model,
            host,
            steps,
            current: 0,
            state: JobState::Idle,
            cancel_requested: false,
            emitted: Vec::new(),
            pending: None,
        })
    }

    /// The job's current state.
    #[inline]
    pub fn state(&self) -> JobState {
        self.state
    }

    /// Total number of steps this job will run.
    #[inline]
    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    /// Number of fully completed steps.
    #[inline]
    pub fn completed_steps(&self) -> usize {
        self.current
    }

    /// Every file written so far, in emission order.
    ///
    /// On failure or cancellation this tells the caller which outputs are
    /// complete.
    #[inline]
    pub fn emitted_paths(&self) -> &[PathBuf] {
        &self.emitted
    }

    /// Borrows the host.
    #[inline]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Requests cancellation; takes effect at the next step boundary.
    pub fn cancel(&mut self) {
        self.cancel_requested = true;
    }

    /// Starts the job by launching the first step.
    ///
    /// # Errors
    ///
    /// Any step error moves the job to [`JobState::Failed`] and propagates.
    pub fn start(&mut self) -> Result<(), PipelineError> {
        if self.state != JobState::Idle {
            return Ok(());
        }
        if self.steps.is_empty() {
            self.state = JobState::Done;
            return Ok(());
        }
        let result = self.begin_step();
        self.fail_on_error(result)
    }

    /// Delivers a finished raster for the awaited step.
    ///
    /// Tiles and saves the raster, then advances to the next step (or
    /// finishes the job, or honours a pending cancellation).
    ///
    /// # Errors
    ///
    /// [`PipelineError::UnexpectedRaster`] if no raster is awaited;
    /// [`PipelineError::RasterMismatch`] if the dimensions are wrong. Step
    /// errors move the job to [`JobState::Failed`] and propagate.
    pub fn raster_ready(&mut self, raster: Raster) -> Result<(), PipelineError> {
        if self.state != JobState::AwaitingRaster || self.pending.is_none() {
            return Err(PipelineError::UnexpectedRaster { state: self.state });
        }
        let result = self.finish_step(raster);
        self.fail_on_error(result)
    }

    fn fail_on_error(&mut self, result: Result<(), PipelineError>) -> Result<(), PipelineError> {
        if result.is_err() {
            self.state = JobState::Failed;
        }
        result
    }

    /// Pre-phase: fit the camera, slice and export the geometry, then hand
    /// off to the host renderer.
    fn begin_step(&mut self) -> Result<(), PipelineError> {
        if self.cancel_requested {
            info!("job cancelled after {} of {} steps", self.current, self.steps.len());
            self.state = JobState::Cancelled;
            return Ok(());
        }
        let step = self.steps[self.current];
        self.state = JobState::Rendering;
        debug!(
            "step {}/{}: {} zoom {} rotation {}",
            self.current + 1,
            self.steps.len(),
            step.night.label(),
            step.zoom.index() + 1,
            step.rotation.compass_name()
        );

        let camera = rig::setup_camera(step.rotation, step.zoom);
        let (camera, canvas) =
            fitter::fit(camera, &self.model.positions, step.zoom, self.config.hd)?;
        let slices = slicer::sliced(&self.model, &camera, &canvas)?;
        let nonempty_tiles: Vec<(u32, u32)> = slices
            .iter()
            .filter(|(_, s)| !s.is_empty())
            .map(|(&pos, _)| pos)
            .collect();

        // the exporter expects world space; slices come out camera-local
        let world = camera.world_matrix();
        let world_slices: BTreeMap<(u32, u32), MeshSlice> = slices
            .into_iter()
            .map(|(pos, s)| {
                (
                    pos,
                    MeshSlice {
                        mesh: s.mesh.transformed(&world),
                        uv: s.uv,
                    },
                )
            })
            .collect();
        let obj_path = self
            .config
            .output_dir
            .join(format!("{}.obj", self.step_filename(step, 0)));
        export::export_obj(&obj_path, &world_slices, step.rotation)?;
        self.emitted.push(obj_path);
        drop(world_slices);

        self.host.apply_night_mode(step.night)?;
        self.host.apply_sun(&rig::sun_placement(step.rotation))?;
        self.host.apply_camera(&camera)?;
        let factor = self.config.supersampling.factor();
        self.pending = Some(PendingRaster {
            canvas,
            nonempty_tiles,
        });
        self.state = JobState::AwaitingRaster;
        self.host
            .request_render(canvas.width_px() * factor, canvas.height_px() * factor)
    }

    /// Post-phase: tile the raster, save the images, advance.
    fn finish_step(&mut self, raster: Raster) -> Result<(), PipelineError> {
        self.state = JobState::Exporting;
        let pending = match self.pending.take() {
            Some(p) => p,
            None => return Err(PipelineError::UnexpectedRaster { state: self.state }),
        };
        let step = self.steps[self.current];
        let factor = self.config.supersampling.factor();
        let want_width = pending.canvas.width_px() * factor;
        let want_height = pending.canvas.height_px() * factor;
        if raster.width() != want_width || raster.height() != want_height {
            return Err(PipelineError::RasterMismatch {
                got_width: raster.width(),
                got_height: raster.height(),
                want_width,
                want_height,
            });
        }

        let mut image = raster.into_image();
        if factor == 2 {
            image = raster::downsample_2x(&image);
        }
        for (count, &(row, col)) in pending.nonempty_tiles.iter().enumerate() {
            let tile = raster::crop_tile(&image, &pending.canvas, row, col);
            let path = self
                .config
                .output_dir
                .join(format!("{}.png", self.step_filename(step, count as u32)));
            raster::save_png(&tile, &path)?;
            self.emitted.push(path);
        }

        self.current += 1;
        if self.current == self.steps.len() {
            self.finish_job()
        } else {
            self.begin_step()
        }
    }

    fn finish_job(&mut self) -> Result<(), PipelineError> {
        if let Some(post) = &self.config.post_processing {
            let archive = self.config.output_dir.join("model.SC4Model");
            Fshgen::new(&post.fshgen_path).build_archive(&self.emitted, &archive)?;
            self.emitted.push(archive);
        }
        info!(
            "job done: {} steps, {} files emitted",
            self.steps.len(),
            self.emitted.len()
        );
        self.state = JobState::Done;
        Ok(())
    }

    /// Output filename stem for a step and nonempty-tile counter.
    fn step_filename(&self, step: Step, tile: u32) -> String {
        let iid = ids::instance_id(step.zoom, step.rotation, tile, step.night.is_night());
        ids::tgi_formatter(&self.config.group_id_hex(), iid, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SuperSampling;
    use batsprite_core::Camera;
    use image::RgbaImage;

    #[derive(Debug)]
    struct MockHost {
        requests: Vec<(u32, u32)>,
        cameras: Vec<Camera>,
        modes: Vec<NightMode>,
        suns: Vec<rig::Placement>,
    }

    impl MockHost {
        fn new() -> Self {
            Self {
                requests: Vec::new(),
                cameras: Vec::new(),
                modes: Vec::new(),
                suns: Vec::new(),
            }
        }
    }

    impl RenderHost for MockHost {
        fn apply_camera(&mut self, camera: &Camera) -> Result<(), PipelineError> {
            self.cameras.push(*camera);
            Ok(())
        }

        fn apply_sun(&mut self, placement: &rig::Placement) -> Result<(), PipelineError> {
            self.suns.push(*placement);
            Ok(())
        }

        fn apply_night_mode(&mut self, mode: NightMode) -> Result<(), PipelineError> {
            self.modes.push(mode);
            Ok(())
        }

        fn request_render(&mut self, width: u32, height: u32) -> Result<(), PipelineError> {
            self.requests.push((width, height));
            Ok(())
        }
    }

    fn test_config(dir: &std::path::Path) -> JobConfig {
        JobConfig {
            group_id: 0xcafe_f00d,
            hd: false,
            night_modes: vec![NightMode::Day],
            supersampling: SuperSampling::Off,
            output_dir: dir.to_path_buf(),
            post_processing: None,
        }
    }

    fn cube_model() -> Mesh {
        use batsprite_core::math::{Aabb, Vec3};
        Mesh::cuboid(&Aabb::from_min_max(
            Vec3::new(-8.0, -8.0, 0.0),
            Vec3::new(8.0, 8.0, 16.0),
        ))
    }

    fn deliver_pending(job: &mut RenderJob<MockHost>) {
        let &(w, h) = job.host().requests.last().unwrap();
        job.raster_ready(Raster::new(RgbaImage::new(w, h))).unwrap();
    }

    #[test]
    fn test_job_step_count() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path());
        config.night_modes = vec![NightMode::Day, NightMode::MaxisNight];
        let job = RenderJob::new(config, cube_model(), MockHost::new()).unwrap();
        assert_eq!(job.total_steps(), 2 * 5 * 4);
        assert_eq!(job.state(), JobState::Idle);
    }

    #[test]
    fn test_both_night_variants_in_one_job_are_rejected() {
        // filenames carry one night flag, so the variants would overwrite
        // each other's outputs
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path());
        config.night_modes = vec![NightMode::MaxisNight, NightMode::DarkNight];
        let err = RenderJob::new(config, cube_model(), MockHost::new()).unwrap_err();
        assert!(matches!(err, PipelineError::ConflictingNightModes { .. }));
    }

    #[test]
    fn test_duplicate_night_modes_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path());
        config.night_modes = vec![NightMode::Day, NightMode::Day];
        let err = RenderJob::new(config, cube_model(), MockHost::new()).unwrap_err();
        assert!(matches!(err, PipelineError::ConflictingNightModes { .. }));
    }

    #[test]
    fn test_raster_before_start_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut job = RenderJob::new(test_config(dir.path()), cube_model(), MockHost::new()).unwrap();
        let err = job.raster_ready(Raster::new(RgbaImage::new(4, 4))).unwrap_err();
        assert!(matches!(err, PipelineError::UnexpectedRaster { .. }));
    }

    #[test]
    fn test_mismatched_raster_fails_the_job() {
        let dir = tempfile::tempdir().unwrap();
        let mut job = RenderJob::new(test_config(dir.path()), cube_model(), MockHost::new()).unwrap();
        job.start().unwrap();
        assert_eq!(job.state(), JobState::AwaitingRaster);
        let err = job.raster_ready(Raster::new(RgbaImage::new(4, 4))).unwrap_err();
        assert!(matches!(err, PipelineError::RasterMismatch { .. }));
        assert_eq!(job.state(), JobState::Failed);
    }

    #[test]
    fn test_cancellation_waits_for_the_step_boundary() {
        let dir = tempfile::tempdir().unwrap();
        let mut job = RenderJob::new(test_config(dir.path()), cube_model(), MockHost::new()).unwrap();
        job.start().unwrap();
        job.cancel();
        // the in-flight step still completes in full
        assert_eq!(job.state(), JobState::AwaitingRaster);
        deliver_pending(&mut job);
        assert_eq!(job.state(), JobState::Cancelled);
        assert_eq!(job.completed_steps(), 1);
        // step 0 emitted one obj and at least one png before the stop
        assert!(job.emitted_paths().len() >= 2);
    }

    #[test]
    fn test_empty_night_modes_finish_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path());
        config.night_modes = Vec::new();
        let mut job = RenderJob::new(config, cube_model(), MockHost::new()).unwrap();
        job.start().unwrap();
        assert_eq!(job.state(), JobState::Done);
        assert!(job.emitted_paths().is_empty());
    }

    #[test]
    fn test_supersampling_doubles_the_requested_resolution() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path());
        config.supersampling = SuperSampling::X2;
        let mut job = RenderJob::new(config, cube_model(), MockHost::new()).unwrap();
        job.start().unwrap();
        let &(w, h) = job.host().requests.last().unwrap();
        assert_eq!(w % 2, 0);
        assert_eq!(h % 2, 0);
        assert_eq!(job.host().suns.len(), 1);
        deliver_pending(&mut job);
        // the saved tiles are at target resolution, so the first png is
        // half the requested render on each axis
        assert_eq!(job.completed_steps(), 1);
    }
}
