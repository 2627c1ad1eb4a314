//! Database instance credentials commands.

use crate::api::{ApiClient, DatabaseApi};
use crate::cli::{
    CredentialsAction, CredentialsCreateArgs, CredentialsDeleteArgs, CredentialsDescribeArgs,
    CredentialsListArgs, DatabaseAction, DatabaseCommand, GlobalArgs,
};
use crate::error::CliError;
use crate::models::{Credentials, CredentialsListItem};
use crate::output::{self, OutputFormat, Printer, Table};
use crate::validate;

#[derive(Debug)]
struct ListInputModel {
    project_id: String,
    instance_id: String,
    limit: Option<i64>,
    output_format: OutputFormat,
}

#[derive(Debug)]
struct CreateInputModel {
    project_id: String,
    instance_id: String,
    output_format: OutputFormat,
    assume_yes: bool,
}

#[derive(Debug)]
struct CredentialsInputModel {
    project_id: String,
    instance_id: String,
    credentials_id: String,
    output_format: OutputFormat,
    assume_yes: bool,
}

pub async fn run(
    cmd: DatabaseCommand,
    global: &GlobalArgs,
    p: &Printer,
    base_url: Option<&str>,
) -> Result<(), CliError> {
    let DatabaseAction::Credentials(credentials) = cmd.action;
    match credentials.action {
        CredentialsAction::List(args) => {
            let model = parse_list_input(&args, global)?;
            p.debug_model(&model);
            let client = ApiClient::configure(base_url)?;
            list(&model, &client, p).await
        }
        CredentialsAction::Create(args) => {
            let model = parse_create_input(&args, global)?;
            p.debug_model(&model);
            if !model.assume_yes {
                p.prompt_for_confirmation(&format!(
                    "Are you sure you want to create credentials for instance {}?",
                    model.instance_id
                ))?;
            }
            let client = ApiClient::configure(base_url)?;
            create(&model, &client, p).await
        }
        CredentialsAction::Describe(args) => {
            let model = parse_describe_input(&args, global)?;
            p.debug_model(&model);
            let client = ApiClient::configure(base_url)?;
            describe(&model, &client, p).await
        }
        CredentialsAction::Delete(args) => {
            let model = parse_delete_input(&args, global)?;
            p.debug_model(&model);
            if !model.assume_yes {
                p.prompt_for_confirmation(&format!(
                    "Are you sure you want to delete credentials {} of instance {}?",
                    model.credentials_id, model.instance_id
                ))?;
            }
            let client = ApiClient::configure(base_url)?;
            delete(&model, &client, p).await
        }
    }
}

fn parse_list_input(
    args: &CredentialsListArgs,
    global: &GlobalArgs,
) -> Result<ListInputModel, CliError> {
    let project_id = validate::project_id(global)?;
    validate::uuid("instance-id", &args.instance_id)?;
    validate::limit(args.limit)?;
    Ok(ListInputModel {
        project_id,
        instance_id: args.instance_id.clone(),
        limit: args.limit,
        output_format: global.output_format,
    })
}

fn parse_create_input(
    args: &CredentialsCreateArgs,
    global: &GlobalArgs,
) -> Result<CreateInputModel, CliError> {
    let project_id = validate::project_id(global)?;
    validate::uuid("instance-id", &args.instance_id)?;
    Ok(CreateInputModel {
        project_id,
        instance_id: args.instance_id.clone(),
        output_format: global.output_format,
        assume_yes: global.assume_yes,
    })
}

fn parse_describe_input(
    args: &CredentialsDescribeArgs,
    global: &GlobalArgs,
) -> Result<CredentialsInputModel, CliError> {
    let project_id = validate::project_id(global)?;
    validate::uuid("instance-id", &args.instance_id)?;
    validate::uuid("credentials-id", &args.credentials_id)?;
    Ok(CredentialsInputModel {
        project_id,
        instance_id: args.instance_id.clone(),
        credentials_id: args.credentials_id.clone(),
        output_format: global.output_format,
        assume_yes: global.assume_yes,
    })
}

fn parse_delete_input(
    args: &CredentialsDeleteArgs,
    global: &GlobalArgs,
) -> Result<CredentialsInputModel, CliError> {
    let project_id = validate::project_id(global)?;
    validate::uuid("instance-id", &args.instance_id)?;
    validate::uuid("credentials-id", &args.credentials_id)?;
    Ok(CredentialsInputModel {
        project_id,
        instance_id: args.instance_id.clone(),
        credentials_id: args.credentials_id.clone(),
        output_format: global.output_format,
        assume_yes: global.assume_yes,
    })
}

async fn list<C: DatabaseApi>(model: &ListInputModel, client: &C, p: &Printer) -> Result<(), CliError> {
    let mut credentials = client
        .list_credentials(&model.project_id, &model.instance_id)
        .await
        .map_err(|e| CliError::execution("list credentials", e))?;

    if credentials.is_empty() {
        p.outputln(&format!(
            "No credentials found for instance {}",
            model.instance_id
        ));
        return Ok(());
    }

    output::truncate(&mut credentials, model.limit);
    output_list(p, model.output_format, &credentials)
}

async fn create<C: DatabaseApi>(
    model: &CreateInputModel,
    client: &C,
    p: &Printer,
) -> Result<(), CliError> {
    let credentials = client
        .create_credentials(&model.project_id, &model.instance_id)
        .await
        .map_err(|e| CliError::execution("create credentials", e))?;
    output_single(p, model.output_format, &credentials)
}

async fn describe<C: DatabaseApi>(
    model: &CredentialsInputModel,
    client: &C,
    p: &Printer,
) -> Result<(), CliError> {
    let credentials = client
        .get_credentials(&model.project_id, &model.instance_id, &model.credentials_id)
        .await
        .map_err(|e| CliError::execution("describe credentials", e))?;
    output_single(p, model.output_format, &credentials)
}

async fn delete<C: DatabaseApi>(
    model: &CredentialsInputModel,
    client: &C,
    p: &Printer,
) -> Result<(), CliError> {
    client
        .delete_credentials(&model.project_id, &model.instance_id, &model.credentials_id)
        .await
        .map_err(|e| CliError::execution("delete credentials", e))?;
    p.outputln(&format!(
        "Deleted credentials {} of instance {}",
        model.credentials_id, model.instance_id
    ));
    Ok(())
}

fn output_list(
    p: &Printer,
    format: OutputFormat,
    credentials: &[CredentialsListItem],
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let details = output::render_json(&credentials)
                .map_err(|e| CliError::render("marshal credentials list", e))?;
            p.outputln(&details);
            Ok(())
        }
        OutputFormat::Yaml => {
            let details = output::render_yaml(&credentials)
                .map_err(|e| CliError::render("marshal credentials list", e))?;
            p.outputln(&details);
            Ok(())
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table.set_header(&["CREDENTIALS ID", "NAME"]);
            for item in credentials {
                table.add_row(vec![item.id.clone(), item.name.clone().unwrap_or_default()]);
            }
            table.display(p);
            Ok(())
        }
    }
}

fn output_single(p: &Printer, format: OutputFormat, credentials: &Credentials) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let details = output::render_json(credentials)
                .map_err(|e| CliError::render("marshal credentials", e))?;
            p.outputln(&details);
            Ok(())
        }
        OutputFormat::Yaml => {
            let details = output::render_yaml(credentials)
                .map_err(|e| CliError::render("marshal credentials", e))?;
            p.outputln(&details);
            Ok(())
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table.add_row(vec!["ID".into(), credentials.id.clone()]);
            table.add_row(vec![
                "HOST".into(),
                credentials.host.clone().unwrap_or_default(),
            ]);
            table.add_row(vec![
                "PORT".into(),
                credentials.port.map(|p| p.to_string()).unwrap_or_default(),
            ]);
            table.add_row(vec![
                "USERNAME".into(),
                credentials.username.clone().unwrap_or_default(),
            ]);
            table.add_row(vec![
                "PASSWORD".into(),
                credentials.password.clone().unwrap_or_default(),
            ]);
            table.add_row(vec![
                "URI".into(),
                credentials.uri.clone().unwrap_or_default(),
            ]);
            table.display(p);
            Ok(())
        }
    }
}
