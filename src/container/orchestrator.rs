// Container lifecycle for the image suites: build -> run -> wait for the
// cid file -> introspect -> teardown

use crate::clock::{Clock, SystemClock};
use crate::config::{Settings, TestConfig};
use crate::container::handle::{BuildRequest, BuildSource, ContainerHandle, ContainerState};
use crate::engine::ContainerEngine;
use crate::errors::{NctError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tracing::{debug, info, warn};

/// Script the S2I builder images print their usage with
pub const S2I_USAGE_SCRIPT: &str = "/usr/libexec/s2i/usage";

/// Sequences container operations against one engine and removes
/// everything it created when torn down or dropped
pub struct Orchestrator<'a, E: ContainerEngine> {
    engine: E,
    config: &'a TestConfig,
    settings: &'a Settings,
    clock: Arc<dyn Clock>,
    cid_dir: TempDir,
    containers: Vec<String>,
    released: Vec<String>,
    images: Vec<String>,
}

impl<'a, E: ContainerEngine> Orchestrator<'a, E> {
    pub fn new(engine: E, config: &'a TestConfig, settings: &'a Settings) -> Result<Self> {
        Self::with_clock(engine, config, settings, Arc::new(SystemClock))
    }

    pub fn with_clock(
        engine: E,
        config: &'a TestConfig,
        settings: &'a Settings,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let cid_dir = tempfile::Builder::new().prefix("nct-cids-").tempdir()?;
        Ok(Self {
            engine,
            config,
            settings,
            clock,
            cid_dir,
            containers: Vec::new(),
            released: Vec::new(),
            images: Vec::new(),
        })
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn config(&self) -> &TestConfig {
        self.config
    }

    /// A handle for an image that already exists. Removing it never
    /// removes the image.
    pub fn handle_for_image(&self, image_name: &str, app_name: &str) -> ContainerHandle {
        let mut handle = ContainerHandle::new(image_name, app_name, false);
        handle.advance(ContainerState::Built);
        handle
    }

    /// Handle for the application image `IMAGE_NAME-<app_name>`
    pub fn app_handle(&self, app_name: &str) -> ContainerHandle {
        self.handle_for_image(&self.config.app_image_name(app_name), app_name)
    }

    /// Build an image. The image is removed at teardown.
    pub fn build_image(&mut self, request: &BuildRequest) -> Result<ContainerHandle> {
        let mut handle = ContainerHandle::new(&request.dest_image, &request.app_name, true);

        info!(
            engine = %self.engine.kind(),
            image = %request.dest_image,
            app = %request.app_name,
            "building image"
        );
        match &request.source {
            BuildSource::Dockerfile {
                dockerfile,
                context,
            } => self
                .engine
                .build(dockerfile, context, &request.dest_image, &request.args)?,
            BuildSource::S2i {
                app_path,
                base_image,
            } => self.engine.s2i_build(
                app_path,
                base_image,
                &request.dest_image,
                &request.args,
            )?,
        }

        handle.advance(ContainerState::Built);
        self.images.push(request.dest_image.clone());
        Ok(handle)
    }

    /// Whether `image` is present in the engine's local store
    pub fn image_exists(&self, image: &str) -> bool {
        self.engine.image_exists(image)
    }

    /// Where the cid file for `cid_name` lives
    pub fn cid_file_path(&self, cid_name: &str) -> PathBuf {
        self.cid_dir.path().join(cid_name)
    }

    /// Start a container from `handle`'s image and wait for its cid file.
    /// Failures are logged and reported as `false`.
    pub fn create_container(
        &mut self,
        handle: &mut ContainerHandle,
        cid_name: &str,
        run_args: &[String],
    ) -> bool {
        if handle.state() != ContainerState::Built {
            warn!(
                image = handle.image_name(),
                state = handle.state().as_str(),
                "container can only be created from a built handle"
            );
            return false;
        }

        let cid_file = self.cid_file_path(cid_name);
        // the engine refuses to overwrite an existing cid file
        if cid_file.exists() {
            if let Err(e) = fs::remove_file(&cid_file) {
                warn!(path = %cid_file.display(), error = %e, "cannot remove stale cid file");
                return false;
            }
        }

        info!(image = handle.image_name(), cid = cid_name, ?run_args, "creating container");
        if let Err(e) = self.engine.run(handle.image_name(), &cid_file, run_args) {
            warn!(image = handle.image_name(), error = %e, "container failed to start");
            self.track_partial(&cid_file);
            return false;
        }

        let timeout = match self.settings.wait_timeout() {
            Ok(timeout) => timeout,
            Err(e) => {
                warn!(error = %e, "invalid wait timeout");
                return false;
            }
        };
        if !self.wait_for_ready(&cid_file, timeout) {
            self.track_partial(&cid_file);
            return false;
        }

        let container_id = match read_cid(&cid_file) {
            Ok(id) => id,
            Err(e) => {
                warn!(path = %cid_file.display(), error = %e, "cannot read cid file");
                return false;
            }
        };

        self.containers.push(container_id.clone());
        debug!(container = %container_id, "container started");
        handle.mark_running(cid_file, container_id)
    }

    /// A failed start can still leave a created container behind
    fn track_partial(&mut self, cid_file: &Path) {
        if let Ok(container_id) = read_cid(cid_file) {
            if !self.containers.contains(&container_id) {
                debug!(container = %container_id, "tracking container from failed start");
                self.containers.push(container_id);
            }
        }
    }

    /// Ids in cid files that were never recorded or removed, such as a cid
    /// written after its readiness wait gave up
    fn untracked_cids(&self) -> Vec<String> {
        let entries = match fs::read_dir(self.cid_dir.path()) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %self.cid_dir.path().display(), error = %e, "cannot list cid files");
                return Vec::new();
            }
        };

        let mut ids = Vec::new();
        for entry in entries.flatten() {
            if let Ok(container_id) = read_cid(&entry.path()) {
                if !self.containers.contains(&container_id)
                    && !self.released.contains(&container_id)
                    && !ids.contains(&container_id)
                {
                    ids.push(container_id);
                }
            }
        }
        ids
    }

    /// Poll until `cid_file` exists with content. Returns `false` once
    /// `timeout` has elapsed, never earlier.
    pub fn wait_for_ready(&self, cid_file: &Path, timeout: Duration) -> bool {
        let interval = self.settings.poll_interval();
        let start = self.clock.now();

        loop {
            if cid_written(cid_file) {
                return true;
            }

            let elapsed = self.clock.now().saturating_duration_since(start);
            if elapsed >= timeout {
                warn!(
                    path = %cid_file.display(),
                    timeout_secs = timeout.as_secs_f64(),
                    "cid file did not appear in time"
                );
                return false;
            }

            self.clock.sleep(interval.min(timeout - elapsed));
        }
    }

    /// Container id recorded in the cid file for `cid_name`
    pub fn get_cid(&self, cid_name: &str) -> Result<String> {
        read_cid(&self.cid_file_path(cid_name))
    }

    /// IP address of a running container
    pub fn get_ip(&self, container_id: &str) -> Result<String> {
        self.engine.inspect_ip(container_id)
    }

    /// IP address of `handle`'s container, resolved once and cached
    pub fn handle_ip(&self, handle: &mut ContainerHandle) -> Result<String> {
        if let Some(ip) = handle.cached_ip() {
            return Ok(ip.to_string());
        }

        let container_id = handle.container_id().ok_or_else(|| {
            NctError::Lookup(format!("No container running for {}", handle.image_name()))
        })?;
        let ip = self.engine.inspect_ip(container_id)?;
        handle.cache_ip(&ip);
        Ok(ip)
    }

    pub fn get_logs(&self, container_id: &str) -> Result<String> {
        self.engine.logs(container_id)
    }

    /// Run a bash command inside a running container
    pub fn exec(&self, container_id: &str, command: &str) -> Result<String> {
        self.engine.exec(container_id, command)
    }

    /// Contents of a file inside a running container
    pub fn file_content(&self, container_id: &str, path: &str) -> Result<String> {
        self.engine.exec(container_id, &format!("cat {}", path))
    }

    /// Run `command` in a throw-away container from `image`
    pub fn run_command(&self, image: &str, command: &str) -> Result<String> {
        self.engine.run_rm(image, Some(command))
    }

    /// Usage text the S2I builder image prints
    pub fn s2i_usage(&self, image: &str) -> Result<String> {
        self.engine.run_rm(image, Some(S2I_USAGE_SCRIPT))
    }

    /// Remove `handle`'s container and, if this orchestrator built it, its
    /// image. Failures are logged, never returned.
    pub fn remove(&mut self, handle: &mut ContainerHandle) {
        if handle.state() == ContainerState::Removed {
            return;
        }

        if let Some(container_id) = handle.container_id() {
            self.remove_container(container_id);
        }
        if handle.owns_image() && handle.state() != ContainerState::Unbuilt {
            self.remove_image(handle.image_name());
        }

        handle.advance(ContainerState::Removed);
    }

    fn remove_container(&mut self, container_id: &str) {
        self.containers.retain(|id| id != container_id);
        self.released.push(container_id.to_string());
        if let Err(e) = self.engine.remove_container(container_id) {
            warn!(container = container_id, error = %e, "failed to remove container");
        }
    }

    fn remove_image(&mut self, image: &str) {
        self.images.retain(|name| name != image);
        if let Err(e) = self.engine.remove_image(image) {
            warn!(image, error = %e, "failed to remove image");
        }
    }

    /// Remove every container this orchestrator started, including any
    /// left behind by a failed start
    pub fn clean_containers(&mut self) {
        let mut pending = self.untracked_cids();
        pending.extend(std::mem::take(&mut self.containers));
        for container_id in pending {
            self.remove_container(&container_id);
        }
    }

    /// Remove every image this orchestrator built
    pub fn clean_images(&mut self) {
        for image in std::mem::take(&mut self.images) {
            self.remove_image(&image);
        }
    }

    pub fn teardown(&mut self) {
        self.clean_containers();
        self.clean_images();
    }
}

impl<E: ContainerEngine> Drop for Orchestrator<'_, E> {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn cid_written(cid_file: &Path) -> bool {
    fs::metadata(cid_file)
        .map(|meta| meta.is_file() && meta.len() > 0)
        .unwrap_or(false)
}

fn read_cid(cid_file: &Path) -> Result<String> {
    let content = fs::read_to_string(cid_file).map_err(|e| {
        NctError::Lookup(format!("Cannot read cid file {}: {}", cid_file.display(), e))
    })?;
    let cid = content.trim();
    if cid.is_empty() {
        return Err(NctError::Lookup(format!(
            "Cid file {} is empty",
            cid_file.display()
        )));
    }
    Ok(cid.to_string())
}
