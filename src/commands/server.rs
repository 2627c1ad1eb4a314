//! Compute server commands.

use crate::api::{ApiClient, ComputeApi};
use crate::cli::{GlobalArgs, ServerAction, ServerCommand, ServerDescribeArgs, ServerListArgs};
use crate::error::CliError;
use crate::models::Server;
use crate::output::{self, OutputFormat, Printer, Table};
use crate::validate;

#[derive(Debug)]
struct ListInputModel {
    project_id: String,
    limit: Option<i64>,
    output_format: OutputFormat,
}

#[derive(Debug)]
struct DescribeInputModel {
    project_id: String,
    server_id: String,
    output_format: OutputFormat,
}

pub async fn run(
    cmd: ServerCommand,
    global: &GlobalArgs,
    p: &Printer,
    base_url: Option<&str>,
) -> Result<(), CliError> {
    match cmd.action {
        ServerAction::List(args) => {
            let model = parse_list_input(&args, global)?;
            p.debug_model(&model);
            let client = ApiClient::configure(base_url)?;
            list(&model, &client, p).await
        }
        ServerAction::Describe(args) => {
            let model = parse_describe_input(&args, global)?;
            p.debug_model(&model);
            let client = ApiClient::configure(base_url)?;
            describe(&model, &client, p).await
        }
    }
}

fn parse_list_input(args: &ServerListArgs, global: &GlobalArgs) -> Result<ListInputModel, CliError> {
    let project_id = validate::project_id(global)?;
    validate::limit(args.limit)?;
    Ok(ListInputModel {
        project_id,
        limit: args.limit,
        output_format: global.output_format,
    })
}

fn parse_describe_input(
    args: &ServerDescribeArgs,
    global: &GlobalArgs,
) -> Result<DescribeInputModel, CliError> {
    let project_id = validate::project_id(global)?;
    validate::uuid("server-id", &args.server_id)?;
    Ok(DescribeInputModel {
        project_id,
        server_id: args.server_id.clone(),
        output_format: global.output_format,
    })
}

async fn list<C: ComputeApi>(model: &ListInputModel, client: &C, p: &Printer) -> Result<(), CliError> {
    let mut servers = client
        .list_servers(&model.project_id)
        .await
        .map_err(|e| CliError::execution("list servers", e))?;

    if servers.is_empty() {
        p.outputln(&format!("No servers found for project {}", model.project_id));
        return Ok(());
    }

    output::truncate(&mut servers, model.limit);
    output_list(p, model.output_format, &servers)
}

async fn describe<C: ComputeApi>(
    model: &DescribeInputModel,
    client: &C,
    p: &Printer,
) -> Result<(), CliError> {
    let server = client
        .get_server(&model.project_id, &model.server_id)
        .await
        .map_err(|e| CliError::execution("describe server", e))?;
    output_single(p, model.output_format, &server)
}

fn output_list(p: &Printer, format: OutputFormat, servers: &[Server]) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let details =
                output::render_json(&servers).map_err(|e| CliError::render("marshal servers", e))?;
            p.outputln(&details);
            Ok(())
        }
        OutputFormat::Yaml => {
            let details =
                output::render_yaml(&servers).map_err(|e| CliError::render("marshal servers", e))?;
            p.outputln(&details);
            Ok(())
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table.set_header(&["SERVER ID", "NAME", "STATUS", "MACHINE TYPE", "ZONE"]);
            for server in servers {
                table.add_row(vec![
                    server.id.clone(),
                    server.name.clone(),
                    server.status.clone().unwrap_or_default(),
                    server.machine_type.clone().unwrap_or_default(),
                    server.availability_zone.clone().unwrap_or_default(),
                ]);
            }
            table.display(p);
            Ok(())
        }
    }
}

fn output_single(p: &Printer, format: OutputFormat, server: &Server) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let details =
                output::render_json(server).map_err(|e| CliError::render("marshal server", e))?;
            p.outputln(&details);
            Ok(())
        }
        OutputFormat::Yaml => {
            let details =
                output::render_yaml(server).map_err(|e| CliError::render("marshal server", e))?;
            p.outputln(&details);
            Ok(())
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table.add_row(vec!["ID".into(), server.id.clone()]);
            table.add_row(vec!["NAME".into(), server.name.clone()]);
            table.add_row(vec![
                "STATUS".into(),
                server.status.clone().unwrap_or_default(),
            ]);
            table.add_row(vec![
                "MACHINE TYPE".into(),
                server.machine_type.clone().unwrap_or_default(),
            ]);
            table.add_row(vec![
                "ZONE".into(),
                server.availability_zone.clone().unwrap_or_default(),
            ]);
            table.display(p);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::error::ApiError;

    const PROJECT_ID: &str = "9b3f7a2e-4c1d-4e8a-b0f3-2d9c5a71e604";
    const SERVER_ID: &str = "5f2c8a90-11de-4f60-9d2a-7b64c3f0a1ce";

    #[derive(Default)]
    struct StubApi {
        servers: Vec<Server>,
        calls: AtomicUsize,
    }

    impl ComputeApi for StubApi {
        async fn list_servers(&self, _: &str) -> Result<Vec<Server>, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.servers.clone())
        }

        async fn get_server(&self, _: &str, server_id: &str) -> Result<Server, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.servers
                .iter()
                .find(|s| s.id == server_id)
                .cloned()
                .ok_or(ApiError::Service {
                    status: 404,
                    message: "server not found".into(),
                })
        }
    }

    fn server(id: &str, status: Option<&str>) -> Server {
        Server {
            id: id.into(),
            name: format!("server-{id}"),
            status: status.map(str::to_string),
            machine_type: Some("c1.2".into()),
            availability_zone: None,
        }
    }

    fn global(project_id: Option<&str>) -> GlobalArgs {
        GlobalArgs {
            project_id: project_id.map(str::to_string),
            output_format: OutputFormat::Table,
            assume_yes: true,
            verbose: false,
        }
    }

    #[test]
    fn list_rejects_zero_limit() {
        let err = parse_list_input(&ServerListArgs { limit: Some(0) }, &global(Some(PROJECT_ID)))
            .unwrap_err();
        assert!(err.to_string().contains("--limit"));
    }

    #[tokio::test]
    async fn missing_project_id_makes_no_api_calls() {
        let stub = StubApi::default();
        let p = Printer::test();
        let result = match parse_list_input(&ServerListArgs { limit: None }, &global(None)) {
            Ok(model) => list(&model, &stub, &p).await,
            Err(e) => Err(e),
        };
        assert!(matches!(result, Err(CliError::MissingProjectId)));
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_project_prints_scope_message() {
        let stub = StubApi::default();
        let p = Printer::test();
        let model =
            parse_list_input(&ServerListArgs { limit: None }, &global(Some(PROJECT_ID))).unwrap();
        list(&model, &stub, &p).await.unwrap();
        assert_eq!(
            p.captured(),
            format!("No servers found for project {PROJECT_ID}\n")
        );
    }

    #[tokio::test]
    async fn absent_optional_fields_render_as_empty_cells() {
        let stub = StubApi {
            servers: vec![server(SERVER_ID, None)],
            calls: AtomicUsize::new(0),
        };
        let p = Printer::test();
        let model =
            parse_list_input(&ServerListArgs { limit: None }, &global(Some(PROJECT_ID))).unwrap();
        list(&model, &stub, &p).await.unwrap();
        let out = p.captured();
        let row = out.trim_end().lines().last().unwrap().to_string();
        // Status column empty, machine type still present.
        assert!(row.contains("c1.2"));
        assert!(!row.contains("null"));
    }

    #[tokio::test]
    async fn describe_unknown_server_is_an_execution_error() {
        let stub = StubApi::default();
        let p = Printer::test();
        let args = ServerDescribeArgs {
            server_id: SERVER_ID.into(),
        };
        let model = parse_describe_input(&args, &global(Some(PROJECT_ID))).unwrap();
        let err = describe(&model, &stub, &p).await.unwrap_err();
        assert!(err.to_string().starts_with("describe server:"));
        assert_eq!(err.exit_code(), 2);
    }
}
