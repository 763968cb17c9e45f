//! cdk8s wiring: Kubernetes manifest synthesis for container-manifest
//! archetypes.

use serde::Serialize;

use crate::domain::artifact::FileArtifact;
use crate::domain::components::build_graph::{
    BuildGraphRegistry, NamedInputEntry, TargetDefault,
};
use crate::domain::components::{Finalize, NodeSetup};
use crate::domain::error::DomainError;
use crate::domain::options::ContainerOptions;
use crate::domain::tasks::Task;
use crate::domain::value_objects::{Archetype, DependencyKind};

pub const CDK8S_FILE: &str = "cdk8s.yaml";
pub const SYNTH_TASK: &str = "cdk8s:synth";
pub const SYNTH_ALL_TASK: &str = "cdk8s:synth:all";

const APP_SAMPLE: &str = r#"import { App, Chart, ChartProps } from 'cdk8s';
import { Construct } from 'constructs';

export class MyChart extends Chart {
  constructor(scope: Construct, id: string, props: ChartProps = {}) {
    super(scope, id, props);
  }
}

const app = new App();
new MyChart(app, 'app');
app.synth();
"#;

const LIBRARY_SAMPLE: &str = r#"import { Chart, ChartProps } from 'cdk8s';
import { Construct } from 'constructs';

export class MyChart extends Chart {
  constructor(scope: Construct, id: string, props: ChartProps = {}) {
    super(scope, id, props);
  }
}
"#;

const TEST_SAMPLE: &str = r#"import { Testing } from 'cdk8s';
import { MyChart } from '../src/main';

describe('MyChart', () => {
  test('synthesizes', () => {
    const app = Testing.app();
    const chart = new MyChart(app, 'test-chart');
    expect(Testing.synth(chart)).toMatchSnapshot();
  });
});
"#;

#[derive(Debug, Clone, PartialEq)]
pub struct ContainerManifest {
    options: ContainerOptions,
    imports: Vec<String>,
    synthesizes: bool,
}

#[derive(Serialize)]
struct Cdk8sDocument<'a> {
    language: &'static str,
    app: String,
    imports: &'a [String],
}

impl ContainerManifest {
    /// Create the component and register its dependencies and tasks.
    pub fn install(setup: &mut NodeSetup<'_>, archetype: Archetype) -> Self {
        let options = setup.options.container.clone();
        let synthesizes = archetype.synthesizes_manifests();

        setup.deps.add("cdk8s", DependencyKind::Runtime);
        setup.deps.add("cdk8s-cli", DependencyKind::Build);
        setup.deps.add(
            &format!("cdk8s-plus-{}", options.k8s_version.minor()),
            DependencyKind::Runtime,
        );

        setup.tasks.add_task(
            Task::new("cdk8s")
                .description("CDK8s command")
                .say("cdk for kubernetes")
                .exec("cdk8s")
                .receive_args(),
        );
        setup.tasks.add_task(
            Task::new("cdk8s:import")
                .description("Import cdk8s charts")
                .say("Importing kubernetes files")
                .exec(format!("cdk8s import --output {}/imports", options.app_path))
                .receive_args(),
        );
        if synthesizes {
            setup.tasks.add_task(
                Task::new(SYNTH_TASK)
                    .description("Synthesized cdk8s constructs")
                    .say("Synthesizing kubernetes files")
                    .exec(format!("cdk8s synth --output {}", options.output_path))
                    .receive_args(),
            );
        }

        let mut imports = vec![format!("k8s@{}", options.k8s_version)];
        imports.extend(options.imports.iter().cloned());

        Self {
            options,
            imports,
            synthesizes,
        }
    }

    pub fn imports(&self) -> &[String] {
        &self.imports
    }

    pub fn synthesizes(&self) -> bool {
        self.synthesizes
    }

    pub fn output_path(&self) -> &str {
        &self.options.output_path
    }

    /// Register the shared synth target and manifest inputs on the root
    /// build graph. Repeated calls from sibling projects converge.
    pub fn contribute(&self, graph: &mut BuildGraphRegistry) {
        graph.set_target_default(
            SYNTH_TASK,
            TargetDefault {
                outputs: Some(vec![format!("{{projectRoot}}/{}", self.options.output_path)]),
                depends_on: Some(vec!["^build".to_string()]),
                cache: Some(true),
                ..Default::default()
            },
        );
        graph.set_named_input(
            "manifests",
            vec![NamedInputEntry::from(format!(
                "{{projectRoot}}/{}/**/*",
                self.options.output_path
            ))],
        );
    }

    fn app_entry(&self) -> String {
        format!("{}/{}", self.options.app_path, self.options.app_file)
    }
}

impl Finalize for ContainerManifest {
    fn render(&self) -> Result<Vec<FileArtifact>, DomainError> {
        let document = Cdk8sDocument {
            language: "typescript",
            app: format!("npx ts-node {}", self.app_entry()),
            imports: &self.imports,
        };
        let sample = if self.synthesizes {
            APP_SAMPLE
        } else {
            LIBRARY_SAMPLE
        };

        Ok(vec![
            FileArtifact::yaml(CDK8S_FILE, &document)?,
            FileArtifact::sample(self.app_entry(), sample),
            FileArtifact::sample("test/main.test.ts", TEST_SAMPLE),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::options::{OptionsResolver, ProjectOptions, TreePosition};
    use crate::domain::tasks::{DependencySet, TaskRegistry};
    use crate::domain::value_objects::K8sVersion;

    fn install(
        archetype: Archetype,
        explicit: ProjectOptions,
    ) -> (ContainerManifest, TaskRegistry, DependencySet) {
        let options = OptionsResolver::resolve(&explicit, archetype, TreePosition::Root);
        let mut tasks = TaskRegistry::new();
        let mut deps = DependencySet::new();
        let mut artifacts = Vec::new();
        let mut setup = NodeSetup {
            options: &options,
            tasks: &mut tasks,
            deps: &mut deps,
            artifacts: &mut artifacts,
        };
        let component = ContainerManifest::install(&mut setup, archetype);
        (component, tasks, deps)
    }

    #[test]
    fn app_registers_synth_task() {
        let (component, tasks, deps) = install(Archetype::Cdk8sApp, ProjectOptions::default());
        assert!(component.synthesizes());
        assert!(tasks.contains("cdk8s"));
        assert!(tasks.contains("cdk8s:import"));
        assert!(tasks.contains(SYNTH_TASK));
        assert!(deps.get("cdk8s-plus-30", DependencyKind::Runtime).is_some());
        assert!(deps.get("cdk8s-cli", DependencyKind::Build).is_some());
    }

    #[test]
    fn library_skips_synth_task() {
        let (component, tasks, _) = install(Archetype::Cdk8sLibrary, ProjectOptions::default());
        assert!(!component.synthesizes());
        assert!(!tasks.contains(SYNTH_TASK));
    }

    #[test]
    fn imports_start_with_k8s_version() {
        let explicit = ProjectOptions {
            k8s_version: Some(K8sVersion::V1_32),
            cdk8s_imports: vec!["github:crossplane/crossplane@0.14.0".into()],
            ..Default::default()
        };
        let (component, _, deps) = install(Archetype::Cdk8sApp, explicit);
        assert_eq!(
            component.imports(),
            ["k8s@1.32.0", "github:crossplane/crossplane@0.14.0"]
        );
        assert!(deps.get("cdk8s-plus-32", DependencyKind::Runtime).is_some());
    }

    #[test]
    fn renders_cdk8s_yaml() {
        let (component, _, _) = install(Archetype::Cdk8sApp, ProjectOptions::default());
        let artifacts = component.render().unwrap();
        let yaml: serde_yaml::Value = serde_yaml::from_str(artifacts[0].content()).unwrap();

        assert_eq!(yaml["language"].as_str(), Some("typescript"));
        assert_eq!(yaml["app"].as_str(), Some("npx ts-node src/main.ts"));
        assert_eq!(yaml["imports"][0].as_str(), Some("k8s@1.30.0"));
        assert!(artifacts[1].is_sample());
        assert_eq!(artifacts[1].path().to_str(), Some("src/main.ts"));
    }

    #[test]
    fn contribution_is_idempotent() {
        let (component, _, _) = install(Archetype::Cdk8sApp, ProjectOptions::default());
        let mut once = BuildGraphRegistry::new();
        component.contribute(&mut once);
        let mut twice = once.clone();
        component.contribute(&mut twice);

        assert_eq!(once, twice);
        assert_eq!(
            twice.target_default(SYNTH_TASK).unwrap().outputs,
            Some(vec!["{projectRoot}/kubernetes".to_string()])
        );
    }
}
