// beatpack-core/src/tree.rs
//! Assembles the platform-installer-agnostic directory/file model from a
//! staged file set, the product configuration and the derived identity.
//! The installer emitter consumes the result as-is.

use std::path::{Path, PathBuf};

use beatpack_common::config::{COMPANY_NAME, PRODUCT_SET_NAME};
use beatpack_common::error::{BeatpackError, Result};
use beatpack_common::model::{Architecture, ArtifactPackage, ProductConfig};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;
use walkdir::WalkDir;

use crate::policy::ExclusionPolicy;

pub const EXE_EXTENSION: &str = ".exe";
const YML_EXTENSION: &str = ".yml";

const SERVICE_DEPENDENCIES: [&str; 2] = ["Tcpip", "Dnscache"];

const INSTALL_DIR_TOKEN: &str = "[INSTALLDIR]";
const COMMON_APP_DATA_TOKEN: &str = "[CommonAppDataFolder]";
const PROGRAM_FILES_64_TOKEN: &str = "[ProgramFiles64Folder]";
const PROGRAM_FILES_32_TOKEN: &str = "[ProgramFilesFolder]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StartMode {
    Auto,
    Manual,
}

/// Installer lifecycle points a service action can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceEvent {
    Install,
    InstallAndUninstall,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceDescriptor {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub arguments: String,
    pub dependencies: Vec<String>,
    pub start: StartMode,
    pub interactive: bool,
    pub start_on: ServiceEvent,
    pub stop_on: ServiceEvent,
    pub remove_on: ServiceEvent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileNode {
    pub source: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<ServiceDescriptor>,
}

impl FileNode {
    fn plain(source: PathBuf) -> Self {
        Self {
            source,
            service: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirNode {
    pub name: String,
    pub dirs: Vec<DirNode>,
    pub files: Vec<FileNode>,
    /// Opens the directory to all local users. The service and the CLI shim
    /// run as different principals and share write access here.
    pub grant_all_users: bool,
}

impl DirNode {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dirs: Vec::new(),
            files: Vec::new(),
            grant_all_users: false,
        }
    }
}

/// Upgrade/downgrade behavior handed to the installer emitter alongside the
/// upgrade code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MajorUpgradePolicy {
    pub allow_downgrades: bool,
    pub allow_same_version_upgrades: bool,
    pub downgrade_error_message: String,
}

impl Default for MajorUpgradePolicy {
    fn default() -> Self {
        Self {
            allow_downgrades: false,
            allow_same_version_upgrades: false,
            downgrade_error_message: "A newer version is already installed.".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageTree {
    pub upgrade_code: Uuid,
    pub display_name: String,
    pub description: String,
    pub version: String,
    pub architecture: Architecture,
    pub major_upgrade: MajorUpgradePolicy,
    /// Versioned install directory appended to the machine PATH, so the CLI
    /// shim is reachable from any shell.
    pub path_env_addition: String,
    pub roots: Vec<DirNode>,
}

pub struct AssembleInputs<'a> {
    pub product: &'a ProductConfig,
    pub package: &'a ArtifactPackage,
    pub upgrade_code: Uuid,
    /// Staged files for this product: flat files plus one level of
    /// subdirectories, externally populated.
    pub staged_root: &'a Path,
    /// Parent of the per-target extra-files directory.
    pub extra_root: &'a Path,
    /// Previously generated CLI shim, placed next to the version directory.
    pub cli_shim_path: &'a Path,
}

/// Builds the complete package tree. No partial tree on failure: a missing
/// staged or extra directory aborts assembly.
pub fn assemble(inputs: &AssembleInputs<'_>) -> Result<PackageTree> {
    let package = inputs.package;
    let product = inputs.product;
    let canonical = &package.canonical_target_name;
    let exe_name = format!("{canonical}{EXE_EXTENSION}");
    let semver = package.semver()?;

    if !inputs.staged_root.is_dir() {
        return Err(BeatpackError::Config(format!(
            "Staged files root {} does not exist",
            inputs.staged_root.display()
        )));
    }

    let policy = ExclusionPolicy::for_product(product, &exe_name);
    let mut package_dir = DirNode::new(canonical.clone());

    // Top-level staged files through the inclusion predicate.
    for path in files_directly_under(inputs.staged_root)? {
        let file_name = leaf_name(&path);
        match policy.exclusion_reason(&file_name) {
            Some(reason) => debug!("Excluding {}: {}", file_name, reason),
            None => package_dir.files.push(FileNode::plain(path)),
        }
    }

    // Immediate subdirectories, minus the runtime-mutable ones.
    for sub in dirs_directly_under(inputs.staged_root)? {
        let dir_name = leaf_name(&sub);
        if product.mutable_dirs.iter().any(|m| *m == dir_name) {
            debug!("Skipping mutable directory {}", dir_name);
            continue;
        }
        package_dir.dirs.push(dir_with_files(&sub)?);
    }

    // Service registration rides on the executable, which re-enters the
    // tree here as one explicit node.
    if product.is_windows_service {
        let descriptor = build_service_descriptor(product, package, &semver.to_string());
        package_dir.files.push(FileNode {
            source: inputs.staged_root.join(&exe_name),
            service: Some(descriptor),
        });
    }

    // Mutable data subtree from the extra-files area.
    let extra_dir = inputs.extra_root.join(&package.target_name);
    if !extra_dir.is_dir() {
        return Err(BeatpackError::Config(format!(
            "Extra files directory {} does not exist",
            extra_dir.display()
        )));
    }
    let mut data_dir = DirNode::new(canonical.clone());
    data_dir.grant_all_users = true;
    for path in files_directly_under(&extra_dir)? {
        if leaf_name(&path).to_ascii_lowercase().ends_with(YML_EXTENSION) {
            data_dir.files.push(FileNode::plain(path));
        }
    }
    for sub in dirs_directly_under(&extra_dir)? {
        data_dir.dirs.push(dir_with_files(&sub)?);
    }

    // Compose the two roots: immutable binaries under program files, shared
    // mutable data under common application data.
    let program_files_token = if package.architecture.is_64bit() {
        PROGRAM_FILES_64_TOKEN
    } else {
        PROGRAM_FILES_32_TOKEN
    };
    let install_root_name = format!(
        "{program_files_token}{}",
        [COMPANY_NAME, PRODUCT_SET_NAME].join("\\")
    );

    let mut version_dir = DirNode::new(package.version.clone());
    version_dir.dirs.push(package_dir);
    version_dir
        .files
        .push(FileNode::plain(inputs.cli_shim_path.to_path_buf()));

    let mut install_root = DirNode::new(install_root_name.clone());
    install_root.dirs.push(version_dir);

    let mut product_set_dir = DirNode::new(PRODUCT_SET_NAME);
    product_set_dir.dirs.push(data_dir);
    let mut company_dir = DirNode::new(COMPANY_NAME);
    company_dir.dirs.push(product_set_dir);
    let mut app_data_root = DirNode::new(COMMON_APP_DATA_TOKEN);
    app_data_root.dirs.push(company_dir);

    Ok(PackageTree {
        upgrade_code: inputs.upgrade_code,
        display_name: format!("{PRODUCT_SET_NAME} {}", package.target_name),
        description: product.description.clone(),
        version: package.version.clone(),
        architecture: package.architecture,
        major_upgrade: MajorUpgradePolicy::default(),
        path_env_addition: format!("{install_root_name}\\{}", package.version),
        roots: vec![install_root, app_data_root],
    })
}

fn build_service_descriptor(
    product: &ProductConfig,
    package: &ArtifactPackage,
    semver_text: &str,
) -> ServiceDescriptor {
    let canonical = &package.canonical_target_name;

    let config_path = format!(
        "{COMMON_APP_DATA_TOKEN}{}",
        [COMPANY_NAME, PRODUCT_SET_NAME, canonical.as_str()].join("\\")
    );
    let data_path = format!("{config_path}\\data");
    let logs_path = format!("{config_path}\\logs");
    let home_path = format!(
        "{INSTALL_DIR_TOKEN}{}",
        [package.version.as_str(), canonical.as_str()].join("\\")
    );

    let arguments = format!(
        " --path.home {} --path.config {} --path.data {} --path.logs {} \
         -E logging.files.redirect_stderr=true",
        quote(&home_path),
        quote(&config_path),
        quote(&data_path),
        quote(&logs_path),
    );

    ServiceDescriptor {
        name: canonical.clone(),
        display_name: format!(
            "{COMPANY_NAME} {} {semver_text}",
            title_case(&package.target_name)
        ),
        description: product.description.clone(),
        arguments,
        dependencies: SERVICE_DEPENDENCIES.iter().map(|s| s.to_string()).collect(),
        start: StartMode::Auto,
        interactive: false,
        start_on: ServiceEvent::Install,
        stop_on: ServiceEvent::InstallAndUninstall,
        remove_on: ServiceEvent::InstallAndUninstall,
    }
}

/// Uppercases the first letter of each whitespace-separated word.
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn quote(s: &str) -> String {
    format!("\"{s}\"")
}

fn leaf_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

// Staged artifacts are laid out flat files plus one level of
// subdirectories; enumeration never recurses past that. Sorted by file
// name so assembly is deterministic across filesystems.

fn files_directly_under(dir: &Path) -> Result<Vec<PathBuf>> {
    entries_directly_under(dir, true)
}

fn dirs_directly_under(dir: &Path) -> Result<Vec<PathBuf>> {
    entries_directly_under(dir, false)
}

fn entries_directly_under(dir: &Path, want_files: bool) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            BeatpackError::Config(format!("Cannot enumerate {}: {e}", dir.display()))
        })?;
        if entry.file_type().is_file() == want_files {
            out.push(entry.into_path());
        }
    }
    Ok(out)
}

fn dir_with_files(dir: &Path) -> Result<DirNode> {
    let mut node = DirNode::new(leaf_name(dir));
    for path in files_directly_under(dir)? {
        node.files.push(FileNode::plain(path));
    }
    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::derive_identity;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        _root: TempDir,
        staged: PathBuf,
        extra: PathBuf,
        shim: PathBuf,
    }

    fn fixture() -> Fixture {
        let root = TempDir::new().unwrap();
        let staged = root.path().join("in").join("lsbeat");
        fs::create_dir_all(&staged).unwrap();
        for name in ["foo.yml", "foo.ps1", "README.md", "data.bin"] {
            fs::write(staged.join(name), name).unwrap();
        }
        fs::write(staged.join("lsbeat.exe"), "binary").unwrap();
        for dir in ["kibana", "data", "logs"] {
            fs::create_dir(staged.join(dir)).unwrap();
        }
        fs::write(staged.join("kibana").join("dashboard.json"), "{}").unwrap();

        let extra = root.path().join("extra");
        let target_extra = extra.join("lsbeat");
        fs::create_dir_all(target_extra.join("modules.d")).unwrap();
        fs::write(target_extra.join("lsbeat.yml"), "config").unwrap();
        fs::write(target_extra.join("NOTICE.txt"), "notice").unwrap();
        fs::write(target_extra.join("modules.d").join("system.yml"), "mod").unwrap();

        let shim = root.path().join("out").join("lsbeat.ps1");
        fs::create_dir_all(shim.parent().unwrap()).unwrap();
        fs::write(&shim, "shim").unwrap();

        Fixture {
            _root: root,
            staged,
            extra,
            shim,
        }
    }

    fn service_product() -> ProductConfig {
        ProductConfig {
            description: "Logs directory events".to_string(),
            is_windows_service: true,
            mutable_dirs: vec!["data".to_string(), "logs".to_string()],
        }
    }

    fn sample_package() -> ArtifactPackage {
        ArtifactPackage {
            target_name: "lsbeat".to_string(),
            canonical_target_name: "lsbeat".to_string(),
            architecture: Architecture::X64,
            version: "1.2.3".to_string(),
            url: None,
            file_name: "lsbeat.exe".to_string(),
        }
    }

    fn assemble_fixture(fx: &Fixture, product: &ProductConfig) -> Result<PackageTree> {
        let package = sample_package();
        assemble(&AssembleInputs {
            product,
            package: &package,
            upgrade_code: derive_identity(&package.canonical_target_name),
            staged_root: &fx.staged,
            extra_root: &fx.extra,
            cli_shim_path: &fx.shim,
        })
    }

    fn package_dir(tree: &PackageTree) -> &DirNode {
        // roots[0] = program files root -> version dir -> canonical dir
        &tree.roots[0].dirs[0].dirs[0]
    }

    #[test]
    fn generic_file_set_honors_the_inclusion_policy() {
        let fx = fixture();
        let tree = assemble_fixture(&fx, &service_product()).unwrap();
        let pkg_dir = package_dir(&tree);

        let plain: Vec<String> = pkg_dir
            .files
            .iter()
            .filter(|f| f.service.is_none())
            .map(|f| leaf_name(&f.source))
            .collect();
        assert_eq!(plain, vec!["data.bin"]);

        // The canonical executable appears exactly once, as the
        // service-carrying node.
        let carriers: Vec<&FileNode> = pkg_dir
            .files
            .iter()
            .filter(|f| leaf_name(&f.source) == "lsbeat.exe")
            .collect();
        assert_eq!(carriers.len(), 1);
        assert!(carriers[0].service.is_some());
    }

    #[test]
    fn mutable_directories_never_reach_the_install_subtree() {
        let fx = fixture();
        let tree = assemble_fixture(&fx, &service_product()).unwrap();
        let names: Vec<&str> = package_dir(&tree)
            .dirs
            .iter()
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(names, vec!["kibana"]);
    }

    #[test]
    fn service_descriptor_carries_paths_dependencies_and_events() {
        let fx = fixture();
        let tree = assemble_fixture(&fx, &service_product()).unwrap();
        let service = package_dir(&tree)
            .files
            .iter()
            .find_map(|f| f.service.as_ref())
            .unwrap();

        assert_eq!(service.name, "lsbeat");
        assert_eq!(service.display_name, "Elastic Lsbeat 1.2.3");
        assert_eq!(service.dependencies, vec!["Tcpip", "Dnscache"]);
        assert_eq!(service.start, StartMode::Auto);
        assert!(!service.interactive);
        assert_eq!(service.start_on, ServiceEvent::Install);
        assert_eq!(service.remove_on, ServiceEvent::InstallAndUninstall);
        assert!(service
            .arguments
            .contains("--path.home \"[INSTALLDIR]1.2.3\\lsbeat\""));
        assert!(service
            .arguments
            .contains("--path.config \"[CommonAppDataFolder]Elastic\\Beats\\lsbeat\""));
        assert!(service
            .arguments
            .contains("--path.data \"[CommonAppDataFolder]Elastic\\Beats\\lsbeat\\data\""));
        assert!(service.arguments.contains("redirect_stderr=true"));
    }

    #[test]
    fn non_service_products_keep_their_executable_in_the_generic_set() {
        let fx = fixture();
        let plain = ProductConfig {
            is_windows_service: false,
            ..service_product()
        };
        let tree = assemble_fixture(&fx, &plain).unwrap();
        let pkg_dir = package_dir(&tree);

        assert!(pkg_dir.files.iter().all(|f| f.service.is_none()));
        assert!(pkg_dir
            .files
            .iter()
            .any(|f| leaf_name(&f.source) == "lsbeat.exe"));
    }

    #[test]
    fn roots_compose_install_and_common_app_data_hierarchies() {
        let fx = fixture();
        let tree = assemble_fixture(&fx, &service_product()).unwrap();

        assert_eq!(tree.roots.len(), 2);
        let install_root = &tree.roots[0];
        assert_eq!(install_root.name, "[ProgramFiles64Folder]Elastic\\Beats");
        let version_dir = &install_root.dirs[0];
        assert_eq!(version_dir.name, "1.2.3");
        assert_eq!(leaf_name(&version_dir.files[0].source), "lsbeat.ps1");

        let app_data = &tree.roots[1];
        assert_eq!(app_data.name, "[CommonAppDataFolder]");
        let data_dir = &app_data.dirs[0].dirs[0].dirs[0];
        assert_eq!(data_dir.name, "lsbeat");
        assert!(data_dir.grant_all_users);
        // Only .yml files from the extra area's top level.
        let data_files: Vec<String> = data_dir
            .files
            .iter()
            .map(|f| leaf_name(&f.source))
            .collect();
        assert_eq!(data_files, vec!["lsbeat.yml"]);
        let data_dirs: Vec<&str> = data_dir.dirs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(data_dirs, vec!["modules.d"]);

        assert_eq!(
            tree.path_env_addition,
            "[ProgramFiles64Folder]Elastic\\Beats\\1.2.3"
        );
        assert_eq!(tree.display_name, "Beats lsbeat");
        assert_eq!(tree.description, "Logs directory events");
        assert_eq!(tree.upgrade_code, derive_identity("lsbeat"));
        assert!(!tree.major_upgrade.allow_downgrades);
    }

    #[test]
    fn x86_packages_land_under_the_32bit_program_files_root() {
        let fx = fixture();
        let mut package = sample_package();
        package.architecture = Architecture::X86;
        let product = service_product();
        let tree = assemble(&AssembleInputs {
            product: &product,
            package: &package,
            upgrade_code: derive_identity("lsbeat"),
            staged_root: &fx.staged,
            extra_root: &fx.extra,
            cli_shim_path: &fx.shim,
        })
        .unwrap();
        assert_eq!(tree.roots[0].name, "[ProgramFilesFolder]Elastic\\Beats");
    }

    #[test]
    fn missing_staged_or_extra_directory_is_fatal() {
        let fx = fixture();
        let product = service_product();
        let package = sample_package();

        let missing_staged = fx.staged.join("nope");
        let err = assemble(&AssembleInputs {
            product: &product,
            package: &package,
            upgrade_code: derive_identity("lsbeat"),
            staged_root: &missing_staged,
            extra_root: &fx.extra,
            cli_shim_path: &fx.shim,
        })
        .unwrap_err();
        assert!(matches!(err, BeatpackError::Config(_)));

        let missing_extra = fx.extra.join("nope");
        let err = assemble(&AssembleInputs {
            product: &product,
            package: &package,
            upgrade_code: derive_identity("lsbeat"),
            staged_root: &fx.staged,
            extra_root: &missing_extra,
            cli_shim_path: &fx.shim,
        })
        .unwrap_err();
        assert!(matches!(err, BeatpackError::Config(_)));
    }

    #[test]
    fn title_case_uppercases_each_word() {
        assert_eq!(title_case("lsbeat"), "Lsbeat");
        assert_eq!(title_case("audit beat"), "Audit Beat");
        assert_eq!(title_case(""), "");
    }
}
