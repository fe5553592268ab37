use crate::{
    core::{
        derive_ingress_host, Images, WorkspaceIdentity, DEFAULT_PERFORMANCE_IMAGE,
        DEFAULT_PFE_IMAGE, DEFAULT_TAG,
    },
    detect, provision, redeploy, resolve, service, KubeCluster,
};
use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use tracing::info;

#[derive(Debug, Parser)]
#[clap(
    name = "codewind-sidecar",
    about = "Deploys Codewind into a Che workspace"
)]
pub struct Args {
    #[clap(
        long,
        default_value = "codewind=info,warn",
        env = "CODEWIND_SIDECAR_LOG"
    )]
    log_level: kubert::LogFilter,

    #[clap(long, default_value = "plain")]
    log_format: kubert::LogFormat,

    #[clap(flatten)]
    client: kubert::ClientArgs,

    /// The ID of the Che workspace Codewind is deployed into.
    #[clap(long, env = "CHE_WORKSPACE_ID")]
    workspace_id: String,

    /// The workspace namespace. Defaults to the client's namespace.
    #[clap(long, short = 'n')]
    namespace: Option<String>,

    /// The public URL of the Che API, e.g. `https://che.example.com/api`.
    ///
    /// Its hostname is used to expose PFE.
    #[clap(long, env = "CHE_API")]
    che_api: Option<String>,

    #[clap(flatten)]
    images: ImageArgs,

    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, clap::Args)]
struct ImageArgs {
    #[clap(long, env = "PFE_IMAGE", default_value = DEFAULT_PFE_IMAGE)]
    pfe_image: String,

    #[clap(long, env = "PFE_TAG", default_value = DEFAULT_TAG)]
    pfe_tag: String,

    #[clap(long, env = "PERFORMANCE_IMAGE", default_value = DEFAULT_PERFORMANCE_IMAGE)]
    performance_image: String,

    #[clap(long, env = "PERFORMANCE_TAG", default_value = DEFAULT_TAG)]
    performance_tag: String,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, clap::Subcommand)]
enum Command {
    /// Creates Codewind's resources for the workspace.
    #[default]
    Deploy,

    /// Recreates Codewind's deployments, picking up new images.
    Redeploy,

    /// Prints the name of the workspace's PFE service, or an empty line.
    GetService,
}

// === impl Args ===

impl Args {
    #[inline]
    pub async fn parse_and_run() -> Result<()> {
        Self::parse().run().await
    }

    pub async fn run(self) -> Result<()> {
        let Self {
            log_level,
            log_format,
            client,
            workspace_id,
            namespace,
            che_api,
            images,
            command,
        } = self;

        log_format
            .try_init(log_level)
            .expect("must configure logging");

        check_workspace_id(&workspace_id)?;

        let client = client
            .try_client()
            .await
            .context("failed to configure Kubernetes client")?;
        let cluster = KubeCluster::new(client);
        let ns = namespace.unwrap_or_else(|| cluster.default_namespace().to_string());

        match command.unwrap_or_default() {
            Command::Deploy => {
                let cluster_info = detect::detect(&cluster).await?;
                let identity =
                    resolve_identity(&cluster, &ns, &workspace_id, che_api.as_deref()).await?;
                provision::provision(&cluster, &identity, &images.into_images(), &cluster_info)
                    .await?;
                info!(%workspace_id, "Deployed Codewind");
            }
            Command::Redeploy => {
                let identity =
                    resolve_identity(&cluster, &ns, &workspace_id, che_api.as_deref()).await?;
                redeploy::redeploy(&cluster, &identity, &images.into_images()).await?;
                info!(%workspace_id, "Redeployed Codewind");
            }
            Command::GetService => {
                let name = service::existing_service(&cluster, &ns, &workspace_id).await?;
                write_service(&mut std::io::stdout().lock(), name.as_deref())?;
            }
        }

        Ok(())
    }
}

/// Every subcommand needs a workspace, so an empty ID is rejected before the
/// cluster is contacted.
fn check_workspace_id(workspace_id: &str) -> Result<(), resolve::Error> {
    if workspace_id.is_empty() {
        return Err(resolve::Error::MissingWorkspaceId);
    }
    Ok(())
}

/// Writes the service name, or an empty line when there is none.
fn write_service<W: Write>(out: &mut W, name: Option<&str>) -> std::io::Result<()> {
    writeln!(out, "{}", name.unwrap_or_default())
}

async fn resolve_identity(
    cluster: &KubeCluster,
    ns: &str,
    workspace_id: &str,
    che_api: Option<&str>,
) -> Result<WorkspaceIdentity> {
    let ingress_host = derive_ingress_host(che_api.unwrap_or_default())?;
    resolve::resolve(cluster, ns, workspace_id, ingress_host).await
}

// === impl ImageArgs ===

impl ImageArgs {
    fn into_images(self) -> Images {
        Images::new(
            &self.pfe_image,
            &self.pfe_tag,
            &self.performance_image,
            &self.performance_tag,
        )
    }
}
