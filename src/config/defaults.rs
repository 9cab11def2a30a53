//! Default configuration values

/// Tests run unless disabled
pub const DEFAULT_SKIP_TEST: bool = false;

/// Packages build as shared libraries unless configured otherwise
pub const DEFAULT_SHARED: bool = true;

/// Position-independent code for static builds
pub const DEFAULT_FPIC: bool = true;

/// Language build tool program
pub const SLM_PROGRAM: &str = "slm";

/// Compiler program
pub const STANZA_PROGRAM: &str = "stanza";

/// Default package output directory, relative to the project
pub const DEFAULT_PACKAGE_DIR: &str = "package";

/// Default source export directory, relative to the project
pub const DEFAULT_EXPORT_DIR: &str = "export";
