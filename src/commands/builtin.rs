//! The palette's built-in Buildkite commands.

use anyhow::{anyhow, Context, Result};
use tokio::sync::mpsc::UnboundedSender;

use super::{split_first_token, Command, CommandRegistry};
use crate::actions::HostRequest;

const DEFAULT_BRANCH: &str = "main";

fn send(requests: &UnboundedSender<HostRequest>, request: HostRequest) -> Result<()> {
    requests.send(request).context("palette host is gone")
}

fn required<'p>(params: Option<&'p str>, what: &str) -> Result<&'p str> {
    params
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| anyhow!("{what} is required"))
}

/// Build the default registry. Pipeline commands are only available when a
/// build source is configured.
pub fn builtin_registry(
    requests: UnboundedSender<HostRequest>,
    has_build_source: bool,
) -> CommandRegistry {
    let mut registry = CommandRegistry::new();

    let tx = requests.clone();
    registry.register(
        Command::new("pipeline", "Go to Pipeline", "Open a pipeline page", move |p| {
            let slug = required(p, "pipeline slug")?;
            send(&tx, HostRequest::OpenPipeline(slug.to_string()))
        })
        .with_keywords(&["open", "goto", "navigate"])
        .with_param_hint("<pipeline>")
        .available_when(move || Ok(has_build_source)),
    );

    let tx = requests.clone();
    registry.register(
        Command::new(
            "builds",
            "Show Recent Builds",
            "List the latest builds of a pipeline",
            move |p| {
                let slug = required(p, "pipeline slug")?;
                send(&tx, HostRequest::ShowBuilds(slug.to_string()))
            },
        )
        .with_keywords(&["history", "status", "runs"])
        .with_param_hint("<pipeline>")
        .available_when(move || Ok(has_build_source)),
    );

    let tx = requests.clone();
    registry.register(
        Command::new("new-build", "Create Build", "Start a new build on a pipeline", move |p| {
            let (pipeline, branch) = split_first_token(required(p, "pipeline slug")?);
            let branch = if branch.is_empty() { DEFAULT_BRANCH } else { branch };
            send(
                &tx,
                HostRequest::CreateBuild {
                    pipeline: pipeline.to_string(),
                    branch: branch.to_string(),
                },
            )
        })
        .with_keywords(&["run", "trigger", "deploy"])
        .with_param_hint("<pipeline> [branch]")
        .available_when(move || Ok(has_build_source)),
    );

    let tx = requests.clone();
    registry.register(
        Command::new(
            "fav-pipeline",
            "Toggle Favorite Pipeline",
            "Star or unstar a pipeline",
            move |p| {
                let slug = required(p, "pipeline slug")?;
                send(&tx, HostRequest::ToggleFavoritePipeline(slug.to_string()))
            },
        )
        .with_keywords(&["star", "favorite", "pin"])
        .with_param_hint("<pipeline>")
        .available_when(move || Ok(has_build_source)),
    );

    let tx = requests.clone();
    registry.register(
        Command::new("fav", "Toggle Favorite Command", "Star or unstar a command", move |p| {
            let id = required(p, "command id")?;
            send(&tx, HostRequest::ToggleFavoriteCommand(id.to_string()))
        })
        .with_keywords(&["star", "favorite", "pin"])
        .with_param_hint("<command>"),
    );

    let tx = requests.clone();
    registry.register(
        Command::new("alias", "Create Alias", "Add a short name for a command", move |p| {
            let definition = required(p, "alias definition")?;
            send(&tx, HostRequest::CreateAlias(definition.to_string()))
        })
        .with_keywords(&["shortcut", "shorthand"])
        .with_param_hint("<name> <command> [default params]"),
    );

    let tx = requests.clone();
    registry.register(
        Command::new("unalias", "Delete Alias", "Remove an alias by name", move |p| {
            let name = required(p, "alias name")?;
            send(&tx, HostRequest::DeleteAlias(name.to_string()))
        })
        .with_keywords(&["remove", "shortcut"])
        .with_param_hint("<name>"),
    );

    let tx = requests.clone();
    registry.register(
        Command::new("reload", "Reload Pipelines", "Fetch the pipeline list again", move |_| {
            send(&tx, HostRequest::ReloadPipelines)
        })
        .with_keywords(&["refresh", "sync"])
        .available_when(move || Ok(has_build_source)),
    );

    let tx = requests;
    registry.register(
        Command::new("close", "Close Palette", "Hide the command palette", move |_| {
            send(&tx, HostRequest::Close)
        })
        .with_keywords(&["exit", "dismiss", "hide"]),
    );

    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::unbounded_channel;

    #[test]
    fn pipeline_commands_need_a_build_source() {
        let (tx, _rx) = unbounded_channel();
        let registry = builtin_registry(tx, false);
        let ids: Vec<&str> = registry.available().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["fav", "alias", "unalias", "close"]);
    }

    #[test]
    fn new_build_defaults_branch() {
        let (tx, mut rx) = unbounded_channel();
        let registry = builtin_registry(tx, true);
        let cmd = registry.get("new-build").unwrap();

        cmd.execute(Some("backend-api")).unwrap();
        cmd.execute(Some("backend-api release/1.2")).unwrap();
        assert_eq!(
            rx.try_recv().unwrap(),
            HostRequest::CreateBuild {
                pipeline: "backend-api".into(),
                branch: "main".into()
            }
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            HostRequest::CreateBuild {
                pipeline: "backend-api".into(),
                branch: "release/1.2".into()
            }
        );
    }

    #[test]
    fn missing_parameter_is_an_error() {
        let (tx, mut rx) = unbounded_channel();
        let registry = builtin_registry(tx, true);
        assert!(registry.get("pipeline").unwrap().execute(None).is_err());
        assert!(registry.get("pipeline").unwrap().execute(Some("  ")).is_err());
        assert!(rx.try_recv().is_err());
    }
}
