// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Two verbs, list and create; every flag can come from a GHDTOOL_ env var.

use clap::builder::NonEmptyStringValueParser;
use clap::{ArgAction, Parser, Subcommand};

use ghdtool::config::{DeploymentQuery, DeploymentRequest, Request};

#[derive(Parser)]
#[command(name = "ghdtool")]
#[command(about = "Record GitHub deployment lifecycle events from CI/CD pipelines")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List deployments
    List {
        /// The account owner of the repository
        #[arg(short, long, env = "GHDTOOL_OWNER", value_parser = NonEmptyStringValueParser::new())]
        owner: String,

        /// The name of the repository without the .git extension
        #[arg(short, long, env = "GHDTOOL_REPOSITORY", value_parser = NonEmptyStringValueParser::new())]
        repository: String,

        /// GitHub token
        #[arg(short, long, env = "GHDTOOL_TOKEN", hide_env_values = true, value_parser = NonEmptyStringValueParser::new())]
        token: String,

        /// The environment that was deployed to (e.g. staging or production)
        #[arg(short, long, env = "GHDTOOL_ENVIRONMENT", value_parser = NonEmptyStringValueParser::new())]
        environment: String,

        /// The name of the ref: a branch, tag, or SHA
        #[arg(short = 'f', long = "ref", env = "GHDTOOL_REF", value_parser = NonEmptyStringValueParser::new())]
        git_ref: String,

        /// The task for the deployment (e.g. deploy or deploy:migrations)
        #[arg(short = 'k', long, env = "GHDTOOL_TASK", value_parser = NonEmptyStringValueParser::new())]
        task: String,
    },

    /// Create a deployment
    Create {
        /// The account owner of the repository
        #[arg(short, long, env = "GHDTOOL_OWNER", value_parser = NonEmptyStringValueParser::new())]
        owner: String,

        /// The name of the repository without the .git extension
        #[arg(short, long, env = "GHDTOOL_REPOSITORY", value_parser = NonEmptyStringValueParser::new())]
        repository: String,

        /// GitHub token
        #[arg(short, long, env = "GHDTOOL_TOKEN", hide_env_values = true, value_parser = NonEmptyStringValueParser::new())]
        token: String,

        /// The environment being deployed to (e.g. staging or production)
        #[arg(short, long, env = "GHDTOOL_ENVIRONMENT", value_parser = NonEmptyStringValueParser::new())]
        environment: String,

        /// The name of the ref: a branch, tag, or SHA
        #[arg(short = 'f', long = "ref", env = "GHDTOOL_REF", value_parser = NonEmptyStringValueParser::new())]
        git_ref: String,

        /// The task for the deployment (e.g. deploy or deploy:migrations)
        #[arg(short = 'k', long, env = "GHDTOOL_TASK", value_parser = NonEmptyStringValueParser::new())]
        task: String,

        /// JSON payload with extra information about the deployment
        #[arg(short, long, env = "GHDTOOL_PAYLOAD", value_parser = NonEmptyStringValueParser::new())]
        payload: String,

        /// Short description of the deployment
        #[arg(short, long, env = "GHDTOOL_DESCRIPTION", value_parser = NonEmptyStringValueParser::new())]
        description: String,

        /// Whether end users interact directly with this environment
        #[arg(short = 'n', long, env = "GHDTOOL_PRODUCTION_ENVIRONMENT", action = ArgAction::Set)]
        production_environment: bool,
    },
}

impl Commands {
    /// Fold the parsed verb into the request sum type.
    pub fn into_request(self) -> Request {
        match self {
            Commands::List {
                owner,
                repository,
                token,
                environment,
                git_ref,
                task,
            } => Request::List(DeploymentQuery {
                owner,
                repository,
                token,
                environment,
                git_ref,
                task,
            }),
            Commands::Create {
                owner,
                repository,
                token,
                environment,
                git_ref,
                task,
                payload,
                description,
                production_environment,
            } => Request::Create(DeploymentRequest {
                owner,
                repository,
                token,
                environment,
                git_ref,
                task,
                payload,
                description,
                production_environment,
            }),
        }
    }
}
