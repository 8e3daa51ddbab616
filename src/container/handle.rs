use std::path::{Path, PathBuf};

/// Lifecycle of a handle. Only ever moves forward; `Removed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ContainerState {
    Unbuilt,
    Built,
    Running,
    Removed,
}

impl ContainerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerState::Unbuilt => "unbuilt",
            ContainerState::Built => "built",
            ContainerState::Running => "running",
            ContainerState::Removed => "removed",
        }
    }
}

/// An image, and at most one container started from it
#[derive(Debug, Clone)]
pub struct ContainerHandle {
    image_name: String,
    app_name: String,
    state: ContainerState,
    owns_image: bool,
    cid_file: Option<PathBuf>,
    container_id: Option<String>,
    ip: Option<String>,
}

impl ContainerHandle {
    pub(crate) fn new(image_name: &str, app_name: &str, owns_image: bool) -> Self {
        Self {
            image_name: image_name.to_string(),
            app_name: app_name.to_string(),
            state: ContainerState::Unbuilt,
            owns_image,
            cid_file: None,
            container_id: None,
            ip: None,
        }
    }

    pub fn image_name(&self) -> &str {
        &self.image_name
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn state(&self) -> ContainerState {
        self.state
    }

    /// Whether removing this handle also removes its image
    pub fn owns_image(&self) -> bool {
        self.owns_image
    }

    pub fn cid_file(&self) -> Option<&Path> {
        self.cid_file.as_deref()
    }

    pub fn container_id(&self) -> Option<&str> {
        self.container_id.as_deref()
    }

    /// Address cached by the last successful lookup
    pub fn cached_ip(&self) -> Option<&str> {
        self.ip.as_deref()
    }

    /// Move to `next` if that is a forward step
    pub(crate) fn advance(&mut self, next: ContainerState) -> bool {
        if next <= self.state {
            return false;
        }
        self.state = next;
        true
    }

    pub(crate) fn mark_running(&mut self, cid_file: PathBuf, container_id: String) -> bool {
        if self.state != ContainerState::Built || !self.advance(ContainerState::Running) {
            return false;
        }
        self.cid_file = Some(cid_file);
        self.container_id = Some(container_id);
        true
    }

    pub(crate) fn cache_ip(&mut self, ip: &str) {
        self.ip = Some(ip.to_string());
    }
}

/// Where an image comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildSource {
    /// Plain engine build of a Dockerfile
    Dockerfile { dockerfile: PathBuf, context: PathBuf },
    /// Application source layered onto a builder image with s2i
    S2i { app_path: PathBuf, base_image: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    pub source: BuildSource,
    pub dest_image: String,
    pub app_name: String,
    pub args: Vec<String>,
}

impl BuildRequest {
    pub fn dockerfile(dockerfile: &Path, context: &Path, dest_image: &str) -> Self {
        Self {
            app_name: dir_name(context),
            source: BuildSource::Dockerfile {
                dockerfile: dockerfile.to_path_buf(),
                context: context.to_path_buf(),
            },
            dest_image: dest_image.to_string(),
            args: Vec::new(),
        }
    }

    pub fn s2i(app_path: &Path, base_image: &str, dest_image: &str) -> Self {
        Self {
            app_name: dir_name(app_path),
            source: BuildSource::S2i {
                app_path: app_path.to_path_buf(),
                base_image: base_image.to_string(),
            },
            dest_image: dest_image.to_string(),
            args: Vec::new(),
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn with_app_name(mut self, app_name: &str) -> Self {
        self.app_name = app_name.to_string();
        self
    }
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "app".to_string())
}
