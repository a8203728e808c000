//! Command execution handlers
//!
//! Each `get` handler fetches through a [`FleetApi`], then writes either a
//! table or spec documents to `out`. Fetches are awaited one after another.

use anyhow::{Context, Result};
use fleet_core::{PackSpec, QueryNameSet, Spec, SpecDocument};
use std::io::Write;

use crate::client::FleetApi;
use crate::format::{self, DocumentWriter, OutputMode};

use super::commands::GetCommands;

/// Dispatch a `get` subcommand
pub async fn handle_get<A, W>(api: &A, command: GetCommands, out: &mut W) -> Result<()>
where
    A: FleetApi + ?Sized,
    W: Write,
{
    match command {
        GetCommands::Queries { name, yaml } => {
            handle_queries(api, name.as_deref(), OutputMode::from_yaml_flag(yaml), out).await
        }
        GetCommands::Packs {
            name,
            yaml,
            with_queries,
        } => {
            handle_packs(
                api,
                name.as_deref(),
                OutputMode::from_yaml_flag(yaml),
                with_queries,
                out,
            )
            .await
        }
        GetCommands::Labels { name, yaml } => {
            handle_labels(api, name.as_deref(), OutputMode::from_yaml_flag(yaml), out).await
        }
        GetCommands::Options => handle_options(api, out).await,
        GetCommands::EnrollSecret => handle_enroll_secret(api, out).await,
        GetCommands::Config => handle_app_config(api, out).await,
        GetCommands::Hosts => handle_hosts(api, out).await,
    }
}

/// Handle `get queries`
pub async fn handle_queries<A, W>(
    api: &A,
    name: Option<&str>,
    mode: OutputMode,
    out: &mut W,
) -> Result<()>
where
    A: FleetApi + ?Sized,
    W: Write,
{
    if let Some(name) = name {
        let query = api.get_query(name).await?;
        return DocumentWriter::new(out)
            .write(&SpecDocument::new(Spec::Query(query)), false)
            .context("unable to print query");
    }

    let queries = api.get_queries().await.context("could not list queries")?;

    match mode {
        OutputMode::Document => {
            let mut writer = DocumentWriter::new(out);
            for query in queries {
                writer
                    .write(&SpecDocument::new(Spec::Query(query)), true)
                    .context("unable to print query")?;
            }
        }
        OutputMode::Table if queries.is_empty() => {
            writeln!(out, "{}", format::empty_message("queries"))?;
        }
        OutputMode::Table => {
            writeln!(out, "{}", format::format_queries(&queries))?;
        }
    }

    Ok(())
}

/// Handle `get packs`
///
/// With `with_queries`, every query referenced by the printed packs follows
/// the pack documents, each at most once. Those queries come from a single
/// bulk fetch filtered by name rather than one lookup per reference.
pub async fn handle_packs<A, W>(
    api: &A,
    name: Option<&str>,
    mode: OutputMode,
    with_queries: bool,
    out: &mut W,
) -> Result<()>
where
    A: FleetApi + ?Sized,
    W: Write,
{
    let mut referenced = QueryNameSet::new();
    let mut add_queries = |pack: &PackSpec| {
        if with_queries {
            referenced.add_pack(pack);
        }
    };

    if let Some(name) = name {
        let pack = api.get_pack(name).await?;
        add_queries(&pack);

        let mut writer = DocumentWriter::new(&mut *out);
        writer
            .write(&SpecDocument::new(Spec::Pack(pack)), with_queries)
            .context("unable to print pack")?;

        return print_referenced_queries(api, with_queries, &referenced, &mut writer).await;
    }

    let packs = api.get_packs().await.context("could not list packs")?;

    match mode {
        OutputMode::Document => {
            let mut writer = DocumentWriter::new(&mut *out);
            for pack in packs {
                add_queries(&pack);
                writer
                    .write(&SpecDocument::new(Spec::Pack(pack)), true)
                    .context("unable to print pack")?;
            }

            print_referenced_queries(api, with_queries, &referenced, &mut writer).await
        }
        OutputMode::Table if packs.is_empty() => {
            writeln!(out, "{}", format::empty_message("packs"))?;
            Ok(())
        }
        OutputMode::Table => {
            writeln!(out, "{}", format::format_packs(&packs))?;
            Ok(())
        }
    }
}

/// Write every query named in `referenced` as a separated document.
///
/// Does nothing, and fetches nothing, unless `with_queries` is set.
async fn print_referenced_queries<A, W>(
    api: &A,
    with_queries: bool,
    referenced: &QueryNameSet,
    writer: &mut DocumentWriter<W>,
) -> Result<()>
where
    A: FleetApi + ?Sized,
    W: Write,
{
    if !with_queries {
        return Ok(());
    }

    let queries = api.get_queries().await.context("could not list queries")?;
    tracing::debug!(
        referenced = referenced.len(),
        fetched = queries.len(),
        "resolving pack queries"
    );

    for query in queries {
        if !referenced.contains(&query.name) {
            continue;
        }

        writer
            .write(&SpecDocument::new(Spec::Query(query)), true)
            .context("unable to print query")?;
    }

    Ok(())
}

/// Handle `get labels`
pub async fn handle_labels<A, W>(
    api: &A,
    name: Option<&str>,
    mode: OutputMode,
    out: &mut W,
) -> Result<()>
where
    A: FleetApi + ?Sized,
    W: Write,
{
    if let Some(name) = name {
        let label = api.get_label(name).await?;
        return DocumentWriter::new(out).write(&SpecDocument::new(Spec::Label(label)), false);
    }

    let labels = api.get_labels().await.context("could not list labels")?;

    match mode {
        OutputMode::Document => {
            let mut writer = DocumentWriter::new(out);
            for label in labels {
                writer.write(&SpecDocument::new(Spec::Label(label)), true)?;
            }
        }
        OutputMode::Table if labels.is_empty() => {
            writeln!(out, "{}", format::empty_message("labels"))?;
        }
        OutputMode::Table => {
            writeln!(out, "{}", format::format_labels(&labels))?;
        }
    }

    Ok(())
}

/// Handle `get options`
pub async fn handle_options<A, W>(api: &A, out: &mut W) -> Result<()>
where
    A: FleetApi + ?Sized,
    W: Write,
{
    let options = api.get_options().await?;
    DocumentWriter::new(out).write(&SpecDocument::new(Spec::Options(options)), false)
}

/// Handle `get enroll_secret`
pub async fn handle_enroll_secret<A, W>(api: &A, out: &mut W) -> Result<()>
where
    A: FleetApi + ?Sized,
    W: Write,
{
    let secrets = api.get_enroll_secret_spec().await?;
    DocumentWriter::new(out).write(&SpecDocument::new(Spec::EnrollSecret(secrets)), false)
}

/// Handle `get config`
pub async fn handle_app_config<A, W>(api: &A, out: &mut W) -> Result<()>
where
    A: FleetApi + ?Sized,
    W: Write,
{
    let config = api.get_app_config().await?;
    DocumentWriter::new(out).write(&SpecDocument::new(Spec::Config(config)), false)
}

/// Handle `get hosts` (table only)
pub async fn handle_hosts<A, W>(api: &A, out: &mut W) -> Result<()>
where
    A: FleetApi + ?Sized,
    W: Write,
{
    let hosts = api.get_hosts().await.context("could not list hosts")?;

    if hosts.is_empty() {
        writeln!(out, "{}", format::empty_message("hosts"))?;
    } else {
        writeln!(out, "{}", format::format_hosts(&hosts))?;
    }

    Ok(())
}
