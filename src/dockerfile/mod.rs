// Dockerfile editing: version pinning, structural validation,
// and temp-file materialization

pub mod editor;
pub mod substitution;
pub mod validation;

pub use editor::{materialize_to_temp_file, pin_version_in_file, DockerfileDocument, DockerfileEditor};
pub use substitution::{
    substitute_env_declaration, substitute_variable_references, SubstitutionRule,
    NGINX_ENV_PREFIX, NGINX_VARIABLE,
};
pub use validation::validate_structure;
