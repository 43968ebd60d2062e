//! Prompt construction.
//!
//! Renders the statistical summary plus a few raw example orders into the
//! user prompts for the three generation tasks, along with the system
//! prompts and the friendly fallback messages for the no-data outcomes.

use crate::insights::InsightSummary;
use crate::models::{CustomerProfile, OrderRecord, ProductRecord};

/// Shown when the store domain does not resolve to an account.
pub const DOMAIN_NOT_FOUND_MESSAGE: &str = "Could not find a store with that domain.";

/// Shown when the window has no orders. `{days}` is substituted.
pub fn no_orders_message(window_days: u32) -> String {
    format!("The store has no orders in the last {window_days} days.")
}

/// System prompt for the personas task.
pub const PERSONAS_SYSTEM_PROMPT: &str = "You are a marketing and consumer-behavior specialist \
who creates detailed, realistic customer personas for commercial strategy. Based on the store \
and customer information provided, you create complete and coherent fictional personas. Keep \
every detail consistent and plausible.";

/// System prompt for the insights task.
pub const INSIGHTS_SYSTEM_PROMPT: &str =
    "You are an e-commerce data assistant specialized in insights for merchants.";

/// System prompt for the product-improvement task.
pub const PRODUCTS_SYSTEM_PROMPT: &str =
    "You are an e-commerce assistant that suggests product improvements based on customer profiles.";

/// Render the store statistics and example orders into the context block
/// shared by all prompts.
pub fn store_context(summary: &InsightSummary, sample: &[&OrderRecord]) -> String {
    let product_names: Vec<&str> = summary
        .best_selling_products
        .iter()
        .map(|(name, _)| name.as_str())
        .collect();
    let top_clients: Vec<String> = summary
        .top_clients
        .iter()
        .map(|(name, count)| format!("{name} ({count} orders)"))
        .collect();
    let genders: Vec<String> = summary
        .orders_by_gender
        .iter()
        .map(|(gender, count)| format!("{gender}: {count}"))
        .collect();
    let campaigns: Vec<&str> = summary.top_campaigns.keys().map(String::as_str).collect();
    let weekdays: Vec<&str> = summary
        .orders_by_weekday
        .keys()
        .map(String::as_str)
        .collect();
    let hours: Vec<String> = summary
        .sales_by_hour
        .keys()
        .map(|hour| format!("{hour}h"))
        .collect();

    let mut context = String::new();
    context.push_str("Store statistics:\n");
    context.push_str(&format!(
        "- Average ticket: R$ {:.2}\n",
        summary.average_ticket
    ));
    context.push_str(&format!("- Best-selling products: {product_names:?}\n"));
    context.push_str(&format!("- Top 3 customers: {}\n", top_clients.join(", ")));
    context.push_str(&format!("- Orders by gender: {}\n", genders.join(", ")));
    context.push_str(&format!("- Most active campaigns: {campaigns:?}\n"));
    context.push_str(&format!("- Days with most orders: {weekdays:?}\n"));
    context.push_str(&format!("- Hours with most orders: {}\n", hours.join(", ")));

    context.push_str("\nReal order examples:\n");
    context.push_str(&format_sample(sample));

    context
}

/// Render the sampled rows as one bullet line per order.
fn format_sample(sample: &[&OrderRecord]) -> String {
    let mut lines = Vec::with_capacity(sample.len());
    for order in sample {
        let mut fields = vec![
            format!("order_id: {}", order.order_id),
            format!("customer: {}", order.customer_name),
            format!("time: {}", order.order_time),
            format!("weekday: {}", order.weekday),
            format!("subtotal: {:.2}", order.subtotal_value),
            format!("products: {}", order.products),
        ];
        if let Some(gender) = &order.customer_gender {
            fields.push(format!("gender: {gender}"));
        }
        if let Some(campaign) = &order.campaign {
            fields.push(format!("campaign: {campaign}"));
        }
        if let Some(date) = &order.order_date {
            fields.push(format!("date: {date}"));
        }
        if let Some(city) = &order.city {
            fields.push(format!("city: {city}"));
        }
        if let Some(state) = &order.state {
            fields.push(format!("state: {state}"));
        }
        if let Some(payment) = &order.payment_method {
            fields.push(format!("payment: {payment}"));
        }
        lines.push(format!("- {}", fields.join(", ")));
    }
    lines.join("\n")
}

/// Build the user prompt for the personas task.
///
/// `context` is empty when the merchant did not authorize use of store data;
/// the model then works from the described customer alone.
pub fn personas_prompt(profile: &CustomerProfile, context: &str) -> String {
    format!(
        r#"You are a smart, friendly assistant that helps merchants create up to 3 customer
personas. Based on the information provided, generate up to 3 personas with:

- Fictional name and photo
- Estimated age
- Lifestyle or profession
- Buying behavior
- Most purchased products
- Preferred communication channels
- Practical communication, SEO and campaign suggestions

Information about a real customer the merchant knows personally, in their own words:
- Name: {name}
- Age: {age}
- Gender: {gender}
- Description: {description}

Return the answer directly as JSON, without markdown code blocks, line breaks, escapes or
extra quotes. The personas must be fictional but share characteristics with the real
customer described above. The JSON must contain a list of personas with exactly this
structure:

{{
  "personas": [
    {{
      "name": "...",
      "photo": "...",
      "age": "...",
      "lifestyle": "...",
      "buying_behavior": "...",
      "top_products": "...",
      "communication_channels": "...",
      "suggestions": "..."
    }}
  ]
}}

{context}"#,
        name = profile.name,
        age = profile.age,
        gender = profile.gender,
        description = profile.description,
        context = context,
    )
}

/// Build the user prompt for the insights task.
pub fn insights_prompt(context: &str) -> String {
    format!(
        r#"Based on the online-store data below, generate "Did you know..." insights. The
sentences must be short, informative and built from the data. Use percentages for
proportions, currency values for prices, and weekday names. Use gender, best-selling
products, average ticket, busiest weekdays, campaigns, peak hours and any other relevant
data. Do not focus on individual customers; describe what they have in common. Vary the
insights, never repeat information, and avoid generic sentences. Where relevant, add
marketing, SEO and communication tips grounded in the data. Return the answer directly as
JSON, without markdown code blocks or extra quotes, with exactly this structure:
{{
  "insights": [
    "...",
    "..."
  ]
}}

{context}"#
    )
}

/// Build the user prompt for the product-improvement task.
pub fn products_prompt(context: &str, products: &[ProductRecord]) -> String {
    let catalog = serde_json::to_string_pretty(products).unwrap_or_else(|_| "[]".to_string());

    format!(
        r#"Based on the customer profile data below, review the store's products and suggest
improvements that could raise customer interest. Evaluate names, prices, categories, SEO
titles and SEO descriptions.

Return JSON with this structure:
{{
  "suggestions": [
    {{
      "product_name": "...",
      "suggestion": "..."
    }}
  ]
}}

Customer context:
{context}

Store products:
{catalog}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::aggregate;

    fn sample_records() -> Vec<OrderRecord> {
        vec![
            OrderRecord {
                order_id: 1,
                customer_name: "Ana".to_string(),
                customer_gender: Some("F".to_string()),
                order_time: "09:10:00".to_string(),
                weekday: "Monday".to_string(),
                subtotal_value: 49.9,
                campaign: Some("spring".to_string()),
                products: "Shirt | Hat".to_string(),
                order_date: Some("2026-08-01".to_string()),
                discount_value: None,
                city: Some("São Paulo".to_string()),
                state: Some("SP".to_string()),
                payment_method: Some("pix".to_string()),
            },
            OrderRecord {
                order_id: 2,
                customer_name: "Bia".to_string(),
                customer_gender: None,
                order_time: "14:00:00".to_string(),
                weekday: "Tuesday".to_string(),
                subtotal_value: 20.1,
                campaign: None,
                products: "Hat".to_string(),
                order_date: None,
                discount_value: None,
                city: None,
                state: None,
                payment_method: None,
            },
        ]
    }

    #[test]
    fn test_store_context_carries_every_metric() {
        let records = sample_records();
        let summary = aggregate(&records).unwrap();
        let sample: Vec<&OrderRecord> = records.iter().collect();

        let context = store_context(&summary, &sample);
        assert!(context.contains("Average ticket: R$ 35.00"));
        assert!(context.contains("Best-selling products"));
        assert!(context.contains("Hat"));
        assert!(context.contains("Ana (1 orders)"));
        assert!(context.contains("F: 1"));
        assert!(context.contains("spring"));
        assert!(context.contains("Monday"));
        assert!(context.contains("9h, 14h"));
        assert!(context.contains("Real order examples:"));
        assert!(context.contains("- order_id: 1"));
        assert!(context.contains("city: São Paulo"));
    }

    #[test]
    fn test_sample_lines_omit_absent_fields() {
        let records = sample_records();
        let rendered = format_sample(&[&records[1]]);
        assert!(rendered.contains("customer: Bia"));
        assert!(!rendered.contains("campaign:"));
        assert!(!rendered.contains("city:"));
    }

    #[test]
    fn test_personas_prompt_embeds_profile_and_schema() {
        let profile = CustomerProfile {
            name: "Carlos".to_string(),
            age: "41".to_string(),
            gender: "M".to_string(),
            description: "Buys running gear monthly".to_string(),
        };

        let prompt = personas_prompt(&profile, "Store statistics:\n- Average ticket: R$ 10.00\n");
        assert!(prompt.contains("Name: Carlos"));
        assert!(prompt.contains("Buys running gear monthly"));
        assert!(prompt.contains("\"personas\""));
        assert!(prompt.contains("Average ticket"));
    }

    #[test]
    fn test_personas_prompt_without_store_data() {
        let profile = CustomerProfile {
            name: "Carlos".to_string(),
            age: "41".to_string(),
            gender: "M".to_string(),
            description: "Buys running gear".to_string(),
        };

        let prompt = personas_prompt(&profile, "");
        assert!(!prompt.contains("Store statistics"));
    }

    #[test]
    fn test_products_prompt_embeds_catalog_json() {
        let products = vec![ProductRecord {
            name: "Linen Shirt".to_string(),
            full_price: 120.0,
            promo_price: None,
            category: Some("Shirts".to_string()),
            seo_title: None,
            seo_description: None,
        }];

        let prompt = products_prompt("ctx", &products);
        assert!(prompt.contains("Linen Shirt"));
        assert!(prompt.contains("\"suggestions\""));
    }

    #[test]
    fn test_no_orders_message_names_the_window() {
        assert_eq!(
            no_orders_message(30),
            "The store has no orders in the last 30 days."
        );
    }
}
