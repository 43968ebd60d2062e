//! Report rendering.
//!
//! Renders one generation run (metadata, the statistical summary, and the
//! parsed model output) as Markdown or JSON.

use crate::insights::InsightSummary;
use crate::models::{GenerationResult, ReportMetadata};
use anyhow::Result;
use serde::Serialize;

/// Everything one run produced, ready to render.
#[derive(Debug, Serialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub summary: InsightSummary,
    pub result: GenerationResult,
}

/// Render the complete Markdown report.
pub fn generate_markdown_report(report: &Report) -> String {
    let mut output = String::new();

    output.push_str("# Persona Forge Report\n\n");
    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_summary_section(&report.summary));
    output.push_str(&generate_result_section(&report.result));
    output.push_str("---\n\n*Generated by Persona Forge*\n");

    output
}

/// Render the report as pretty-printed JSON.
pub fn generate_json_report(report: &Report) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Store:** {}\n", metadata.store_domain));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Model:** `{}`\n", metadata.model_used));
    section.push_str(&format!(
        "- **Orders analyzed:** {} (last {} days)\n",
        metadata.orders_analyzed, metadata.window_days
    ));
    section.push_str(&format!(
        "- **Duration:** {:.1}s\n",
        metadata.duration_seconds
    ));
    section.push('\n');

    section
}

fn generate_summary_section(summary: &InsightSummary) -> String {
    let mut section = String::new();

    section.push_str("## Store Statistics\n\n");
    section.push_str(&format!(
        "- **Average ticket:** R$ {:.2}\n",
        summary.average_ticket
    ));

    if !summary.best_selling_products.is_empty() {
        section.push_str("- **Best-selling products:**\n");
        for (name, count) in &summary.best_selling_products {
            section.push_str(&format!("  - {name} ({count} units)\n"));
        }
    }

    if !summary.top_clients.is_empty() {
        section.push_str("- **Top customers:**\n");
        for (name, count) in &summary.top_clients {
            section.push_str(&format!("  - {name} ({count} orders)\n"));
        }
    }

    if !summary.orders_by_gender.is_empty() {
        let genders: Vec<String> = summary
            .orders_by_gender
            .iter()
            .map(|(gender, count)| format!("{gender}: {count}"))
            .collect();
        section.push_str(&format!("- **Orders by gender:** {}\n", genders.join(", ")));
    }

    if !summary.top_campaigns.is_empty() {
        let campaigns: Vec<String> = summary
            .top_campaigns
            .iter()
            .map(|(name, count)| format!("{name} ({count})"))
            .collect();
        section.push_str(&format!("- **Top campaigns:** {}\n", campaigns.join(", ")));
    }

    if !summary.orders_by_weekday.is_empty() {
        let weekdays: Vec<String> = summary
            .orders_by_weekday
            .iter()
            .map(|(day, count)| format!("{day} ({count})"))
            .collect();
        section.push_str(&format!("- **Busiest days:** {}\n", weekdays.join(", ")));
    }

    if !summary.sales_by_hour.is_empty() {
        let hours: Vec<String> = summary
            .sales_by_hour
            .iter()
            .map(|(hour, count)| format!("{hour:02}h ({count})"))
            .collect();
        section.push_str(&format!("- **Orders by hour:** {}\n", hours.join(", ")));
    }

    section.push('\n');
    section
}

fn generate_result_section(result: &GenerationResult) -> String {
    let mut section = String::new();

    match result {
        GenerationResult::Personas(set) => {
            section.push_str("## Personas\n\n");
            for (i, persona) in set.personas.iter().enumerate() {
                section.push_str(&format!("### {}. {}\n\n", i + 1, persona.name));
                section.push_str(&format!("- **Photo:** {}\n", persona.photo));
                section.push_str(&format!("- **Age:** {}\n", persona.age));
                section.push_str(&format!("- **Lifestyle:** {}\n", persona.lifestyle));
                section.push_str(&format!(
                    "- **Buying behavior:** {}\n",
                    persona.buying_behavior
                ));
                section.push_str(&format!("- **Top products:** {}\n", persona.top_products));
                section.push_str(&format!(
                    "- **Channels:** {}\n",
                    persona.communication_channels
                ));
                section.push_str(&format!("- **Suggestions:** {}\n", persona.suggestions));
                section.push('\n');
            }
        }
        GenerationResult::Insights(list) => {
            section.push_str("## Insights\n\n");
            for insight in &list.insights {
                section.push_str(&format!("- {insight}\n"));
            }
            section.push('\n');
        }
        GenerationResult::Suggestions(list) => {
            section.push_str("## Product Suggestions\n\n");
            for suggestion in &list.suggestions {
                section.push_str(&format!(
                    "- **{}**: {}\n",
                    suggestion.product_name, suggestion.suggestion
                ));
            }
            section.push('\n');
        }
    }

    section
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::aggregate;
    use crate::models::{InsightList, OrderRecord, Persona, PersonaSet};
    use chrono::Utc;

    fn sample_report(result: GenerationResult) -> Report {
        let records = vec![OrderRecord {
            order_id: 1,
            customer_name: "Ana".to_string(),
            customer_gender: Some("F".to_string()),
            order_time: "09:10:00".to_string(),
            weekday: "Monday".to_string(),
            subtotal_value: 49.9,
            campaign: Some("spring".to_string()),
            products: "Shirt | Hat".to_string(),
            order_date: None,
            discount_value: None,
            city: None,
            state: None,
            payment_method: None,
        }];

        Report {
            metadata: ReportMetadata {
                store_domain: "loja.example.com".to_string(),
                generated_at: Utc::now(),
                model_used: "gpt-4o".to_string(),
                orders_analyzed: records.len(),
                window_days: 30,
                duration_seconds: 3.2,
            },
            summary: aggregate(&records).unwrap(),
            result,
        }
    }

    #[test]
    fn test_markdown_report_for_insights() {
        let report = sample_report(GenerationResult::Insights(InsightList {
            insights: vec!["Did you know 60% of orders arrive before noon?".to_string()],
        }));

        let markdown = generate_markdown_report(&report);
        assert!(markdown.contains("# Persona Forge Report"));
        assert!(markdown.contains("**Store:** loja.example.com"));
        assert!(markdown.contains("## Store Statistics"));
        assert!(markdown.contains("Average ticket:** R$ 49.90"));
        assert!(markdown.contains("## Insights"));
        assert!(markdown.contains("before noon"));
    }

    #[test]
    fn test_markdown_report_for_personas() {
        let report = sample_report(GenerationResult::Personas(PersonaSet {
            personas: vec![Persona {
                name: "Maria".to_string(),
                photo: "https://example.com/m.png".to_string(),
                age: "34".to_string(),
                lifestyle: "Urban".to_string(),
                buying_behavior: "Weekend buyer".to_string(),
                top_products: "Shirts".to_string(),
                communication_channels: "Instagram".to_string(),
                suggestions: "Weekend promos".to_string(),
            }],
        }));

        let markdown = generate_markdown_report(&report);
        assert!(markdown.contains("### 1. Maria"));
        assert!(markdown.contains("**Buying behavior:** Weekend buyer"));
    }

    #[test]
    fn test_json_report_keeps_summary_keys() {
        let report = sample_report(GenerationResult::Insights(InsightList {
            insights: vec![],
        }));

        let json = generate_json_report(&report).unwrap();
        assert!(json.contains("\"ticket_medio_produtos\""));
        assert!(json.contains("\"horas_com_mais_vendas\""));
    }
}
