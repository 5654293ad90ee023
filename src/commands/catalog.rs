use crate::agents::AgentCreationFormService;
use crate::agents::BUILT_IN_TEMPLATES;
use crate::catalog::{experimental_tool_info, hook_templates_by_category, HOOK_TEMPLATES};
use crate::error::Result;

pub fn templates() -> Result<()> {
    println!("Agent templates:");
    for template in BUILT_IN_TEMPLATES {
        println!("  {:<15} {}", template.name, template.description);
        println!("  {:<15} tools: {}", "", template.tools.join(", "));
        println!("  {:<15} resources: {}", "", template.resources.join(", "));
    }
    Ok(())
}

pub fn tools() -> Result<()> {
    for section in AgentCreationFormService::tool_sections() {
        println!("{}:", section.title);
        if let Some(warning) = section.warning_message {
            println!("  ⚠ {}", warning);
        }
        for tool in &section.tools {
            let default = if tool.default_allowed {
                " (allowed by default)"
            } else {
                ""
            };
            println!("  {:<14} {}{}", tool.name, tool.description, default);
            if let Some(info) = experimental_tool_info(tool.name) {
                println!(
                    "  {:<14} [{}] {}",
                    "",
                    info.warning_level.as_str(),
                    info.stability_note
                );
            }
        }
        println!();
    }
    Ok(())
}

pub fn hooks(category: Option<&str>) -> Result<()> {
    let templates = match category {
        Some(category) => hook_templates_by_category(category),
        None => HOOK_TEMPLATES.iter().collect(),
    };

    if templates.is_empty() {
        println!("No hook templates found.");
        return Ok(());
    }

    println!("{:<16} {:<18} {:<8} COMMAND", "ID", "TRIGGER", "CATEGORY");
    for template in templates {
        println!(
            "{:<16} {:<18} {:<8} {}",
            template.id,
            template.trigger.as_str(),
            template.category.as_str(),
            template.command
        );
    }
    Ok(())
}
