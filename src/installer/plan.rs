//! Install plan construction.

use crate::config::schema::Manifest;
use crate::shell::command::render_command;

/// One planned installer invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallSpec {
    /// Package name, for display and reporting.
    pub name: String,

    /// Requirement string handed to the installer (`name` or `name==pin`).
    pub requirement: String,

    /// Program to spawn.
    pub program: String,

    /// Arguments, including the requirement and index flag.
    pub args: Vec<String>,
}

impl InstallSpec {
    /// Render the full command line for dry-run output and error blocks.
    pub fn render(&self) -> String {
        render_command(&self.program, &self.args)
    }
}

/// The resolved install plan: every dependency, in manifest order.
#[derive(Debug, Clone, Default)]
pub struct InstallPlan {
    specs: Vec<InstallSpec>,
}

impl InstallPlan {
    /// Build the plan from a manifest and the probed runtime.
    ///
    /// `index_override` is the invocation-time index substitution
    /// (`--index-url`); it beats both the per-dependency override and the
    /// manifest setting, which is what makes offline/test substitution a
    /// one-flag affair.
    pub fn build(manifest: &Manifest, runtime: &str, index_override: Option<&str>) -> Self {
        let prefix = manifest.install.installer_argv(runtime);

        let specs = manifest
            .dependencies
            .iter()
            .map(|dep| {
                let (program, base_args) = prefix
                    .split_first()
                    .map(|(p, rest)| (p.clone(), rest.to_vec()))
                    .unwrap_or_default();

                let mut args = base_args;
                args.push(dep.requirement());

                let index = index_override
                    .map(str::to_string)
                    .or_else(|| dep.index_url.clone())
                    .or_else(|| manifest.install.index_url.clone());
                if let Some(index) = index {
                    args.push("-i".to_string());
                    args.push(index);
                }

                InstallSpec {
                    name: dep.name.clone(),
                    requirement: dep.requirement(),
                    program,
                    args,
                }
            })
            .collect();

        Self { specs }
    }

    /// Build a plan from pre-constructed specs (tests and dry-run tooling).
    pub fn from_specs(specs: Vec<InstallSpec>) -> Self {
        Self { specs }
    }

    /// The planned invocations, in order.
    pub fn specs(&self) -> &[InstallSpec] {
        &self.specs
    }

    /// Number of planned invocations.
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Whether the plan has nothing to do.
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{DependencySpec, InstallSettings, Manifest};

    #[test]
    fn builtin_plan_has_one_spec_per_dependency() {
        let manifest = Manifest::builtin();
        let plan = InstallPlan::build(&manifest, "python3", None);

        assert_eq!(plan.len(), 5);
        let first = &plan.specs()[0];
        assert_eq!(first.program, "python3");
        assert_eq!(
            first.args,
            vec![
                "-m",
                "pip",
                "install",
                "moviepy==1.0.3",
                "-i",
                "https://pypi.tuna.tsinghua.edu.cn/simple",
            ]
        );
    }

    #[test]
    fn plan_preserves_manifest_order() {
        let manifest = Manifest::builtin();
        let plan = InstallPlan::build(&manifest, "python3", None);

        let names: Vec<_> = plan.specs().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["moviepy", "PyQt5", "numpy", "opencv-python", "Pillow"]
        );
    }

    #[test]
    fn index_override_beats_manifest_and_dependency() {
        let mut manifest = Manifest::builtin();
        manifest.dependencies[1].index_url = Some("https://pypi.org/simple".to_string());

        let plan = InstallPlan::build(&manifest, "python3", Some("http://localhost:1234/simple"));

        for spec in plan.specs() {
            assert!(spec.args.contains(&"http://localhost:1234/simple".to_string()));
            assert!(!spec.args.contains(&"https://pypi.org/simple".to_string()));
        }
    }

    #[test]
    fn dependency_index_beats_manifest_index() {
        let mut manifest = Manifest::builtin();
        manifest.dependencies[0].index_url = Some("https://pypi.org/simple".to_string());

        let plan = InstallPlan::build(&manifest, "python3", None);

        assert!(plan.specs()[0]
            .args
            .contains(&"https://pypi.org/simple".to_string()));
        assert!(plan.specs()[1]
            .args
            .contains(&"https://pypi.tuna.tsinghua.edu.cn/simple".to_string()));
    }

    #[test]
    fn no_index_flag_when_unset() {
        let manifest = Manifest {
            install: InstallSettings {
                index_url: None,
                ..Default::default()
            },
            dependencies: vec![DependencySpec::unpinned("numpy")],
            ..Default::default()
        };

        let plan = InstallPlan::build(&manifest, "python3", None);
        assert!(!plan.specs()[0].args.contains(&"-i".to_string()));
    }

    #[test]
    fn custom_installer_program_used_verbatim() {
        let manifest = Manifest {
            install: InstallSettings {
                program: vec!["/opt/fake-pip".to_string(), "install".to_string()],
                index_url: None,
                ..Default::default()
            },
            dependencies: vec![DependencySpec::unpinned("numpy")],
            ..Default::default()
        };

        let plan = InstallPlan::build(&manifest, "python3", None);
        let spec = &plan.specs()[0];
        assert_eq!(spec.program, "/opt/fake-pip");
        assert_eq!(spec.args, vec!["install", "numpy"]);
    }

    #[test]
    fn render_shows_full_command() {
        let manifest = Manifest::builtin();
        let plan = InstallPlan::build(&manifest, "python3", None);

        let rendered = plan.specs()[0].render();
        assert!(rendered.starts_with("python3 -m pip install moviepy==1.0.3"));
        assert!(rendered.contains("-i https://"));
    }

    #[test]
    fn empty_dependency_list_is_empty_plan() {
        let manifest = Manifest::default();
        let plan = InstallPlan::build(&manifest, "python3", None);
        assert!(plan.is_empty());
    }
}
