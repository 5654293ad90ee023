use super::App;
use crate::agents::{
    find_template, Agent, AgentCreationFormService, AgentFormData, AgentLocation,
};
use crate::cli::{AgentCommands, CreateArgs};
use crate::error::{QcliAgentsError, Result};

pub fn execute(app: &App, command: &AgentCommands) -> Result<()> {
    match command {
        AgentCommands::List => list(app),
        AgentCommands::Show { name } => show(app, name),
        AgentCommands::Validate { name } => validate(app, name),
        AgentCommands::Create(args) => create(app, args),
        AgentCommands::New {
            name,
            template,
            global,
        } => new_from_template(app, name, template, *global),
        AgentCommands::Delete { name, global } => delete(app, name, *global),
        AgentCommands::Conflicts { name } => conflicts(app, name),
    }
}

fn list(app: &App) -> Result<()> {
    let entries = app.store.list();
    if entries.is_empty() {
        println!("No agents found.");
        if !app.locations().has_workspace() {
            println!("(no workspace folder open; only global agents are listed)");
        }
        return Ok(());
    }

    println!("{:<30} {:<8} {}", "AGENT", "LOCATION", "NOTE");
    println!("{}", "-".repeat(60));
    for entry in entries {
        let note = if entry.has_conflict {
            "overrides global"
        } else {
            ""
        };
        println!("{:<30} {:<8} {}", entry.name, entry.location, note);
    }
    Ok(())
}

fn show(app: &App, name: &str) -> Result<()> {
    let agent = app.store.load(name)?;
    println!("# {}", agent.file_path().display());
    println!("{}", agent.config().to_json_pretty()?);
    Ok(())
}

fn validate(app: &App, name: &str) -> Result<()> {
    let agent = app.store.load(name)?;
    let mut errors = agent.validate().errors;
    errors.extend(agent.config().structural_errors());

    if errors.is_empty() {
        println!("✓ Agent \"{}\" is valid", name);
        return Ok(());
    }

    println!("✗ Agent \"{}\" is invalid:", name);
    for error in &errors {
        println!("  - {}", error);
    }
    Err(QcliAgentsError::InvalidAgent(errors))
}

/// Form data for `agent create`: defaults, replaced field by field by flags.
pub fn form_from_args(args: &CreateArgs, location: AgentLocation) -> AgentFormData {
    let mut form = AgentCreationFormService::default_form_data();
    form.name = args.name.clone();
    form.description = args
        .description
        .clone()
        .unwrap_or_else(|| format!("{} agent", args.name));
    form.prompt = args.prompt.clone().unwrap_or_default();
    form.location = location;
    if !args.tools.is_empty() {
        form.tools.available = args.tools.clone();
    }
    if !args.allowed.is_empty() {
        form.tools.allowed = args.allowed.clone();
    }
    form.tools.experimental = args.experimental.clone();
    if !args.resources.is_empty() {
        form.resources = args.resources.clone();
    }
    form
}

fn create(app: &App, args: &CreateArgs) -> Result<()> {
    let form = form_from_args(args, app.location(args.global));

    let validation = AgentCreationFormService::validate_form_data(&form);
    for warning in &validation.warnings {
        eprintln!("Warning: {}", warning.message);
    }
    if !validation.is_valid {
        for error in &validation.errors {
            eprintln!("Error ({}): {}", error.field.as_str(), error.message);
        }
    }

    let created = app.form_service().create_agent_from_form_data(&form)?;
    println!(
        "✓ Created agent \"{}\" at {}",
        form.name,
        created.display_path.display()
    );
    Ok(())
}

fn new_from_template(app: &App, name: &str, template: &str, global: bool) -> Result<()> {
    let template = find_template(template).ok_or_else(|| {
        QcliAgentsError::InvalidAgent(vec![format!(
            "Unknown template \"{}\" (available: {})",
            template,
            crate::agents::templates::template_names().join(", ")
        )])
    })?;

    let location = app.location(global);
    let path = app.locations().resolve_agent_path(name, location)?;
    if app.locations().agent_exists(name, location) {
        return Err(QcliAgentsError::AgentExists(name.to_string()));
    }

    app.locations().ensure_directory_exists(location)?;
    let agent = Agent::create(name, path, Some(&template.to_patch()))?;
    app.store.save(&agent)?;

    println!(
        "✓ Created {} agent \"{}\" from template \"{}\" at {}",
        location,
        name,
        template.name,
        agent.file_path().display()
    );
    Ok(())
}

fn delete(app: &App, name: &str, global: bool) -> Result<()> {
    let location = if global {
        AgentLocation::Global
    } else {
        AgentLocation::Local
    };
    app.store.delete(name, location)?;
    println!("✓ Deleted {} agent \"{}\"", location, name);

    let remaining = app.locations().detect_name_conflicts(name);
    if let Some(other) = remaining.effective_location() {
        println!("  \"{}\" still exists in the {} location", name, other);
    }
    Ok(())
}

fn conflicts(app: &App, name: &str) -> Result<()> {
    let info = app.locations().detect_name_conflicts(name);
    let yes_no = |b: bool| if b { "yes" } else { "no" };

    println!("Agent \"{}\":", name);
    println!("  local:  {}", yes_no(info.local_exists));
    println!("  global: {}", yes_no(info.global_exists));
    println!("  conflict: {}", yes_no(info.has_conflict));
    println!("  recommended action: {}", info.recommended_action.as_str());
    if let Some(location) = info.effective_location() {
        println!("  effective: {}", location);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_from_args_defaults() {
        let args = CreateArgs {
            name: "helper".into(),
            ..Default::default()
        };
        let form = form_from_args(&args, AgentLocation::Local);
        assert_eq!(form.description, "helper agent");
        assert_eq!(form.tools.allowed, vec!["fs_read"]);
        assert_eq!(form.resources.len(), 3);
        assert!(AgentCreationFormService::validate_form_data(&form).is_valid);
    }

    #[test]
    fn test_form_from_args_overrides() {
        let args = CreateArgs {
            name: "helper".into(),
            description: Some("Helps".into()),
            prompt: Some("Be brief".into()),
            tools: vec!["fs_read".into()],
            allowed: vec!["fs_write".into()],
            resources: vec!["file://docs/**".into()],
            ..Default::default()
        };
        let form = form_from_args(&args, AgentLocation::Global);
        assert_eq!(form.location, AgentLocation::Global);
        assert_eq!(form.tools.available, vec!["fs_read"]);
        assert_eq!(form.resources, vec!["file://docs/**"]);

        let result = AgentCreationFormService::validate_form_data(&form);
        assert!(!result.is_valid);
        assert_eq!(
            result.errors[0].message,
            "Allowed tool \"fs_write\" must be in available tools"
        );
    }
}
