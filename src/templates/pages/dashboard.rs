use crate::domain::{Lead, LeadStatus};
use crate::drafting::prompt::DEFAULT_TEMPLATE;
use crate::store::LeadStats;
use crate::templates::{card, desktop_layout, stat_card, status_badge};
use maud::{html, Markup};

pub struct DashboardVm {
    pub stats: LeadStats,
    /// Non-empty status groups, in lifecycle order.
    pub groups: Vec<(LeadStatus, Vec<Lead>)>,
    pub notice: Option<String>,
    pub default_subject: String,
    pub daily_email_limit: u32,
}

impl DashboardVm {
    pub fn group(leads: Vec<Lead>) -> Vec<(LeadStatus, Vec<Lead>)> {
        let mut groups: Vec<(LeadStatus, Vec<Lead>)> =
            LeadStatus::ALL.iter().map(|s| (*s, Vec::new())).collect();
        for lead in leads {
            if let Some((_, bucket)) = groups.iter_mut().find(|(s, _)| *s == lead.status) {
                bucket.push(lead);
            }
        }
        groups.retain(|(_, leads)| !leads.is_empty());
        groups
    }
}

pub fn dashboard_page(vm: &DashboardVm) -> Markup {
    desktop_layout(
        "Lead Outreach Dashboard",
        html! {
            main class="container" {
                @if let Some(notice) = &vm.notice {
                    div class="notice" { (notice) }
                }

                div class="stats" {
                    (stat_card("Total Leads", vm.stats.total))
                    (stat_card("Sourced", vm.stats.sourced))
                    (stat_card("AI Generated", vm.stats.message_generated))
                    (stat_card("Contacted", vm.stats.contacted))
                    (stat_card("Replied", vm.stats.replied))
                    (stat_card("Converted", vm.stats.converted))
                }

                (scrape_card())
                (flow_card(vm))
                (add_lead_card())

                @if vm.groups.is_empty() {
                    (card("Leads", html! { p { "No leads yet. Run a scrape to get started." } }))
                }
                @for (status, leads) in &vm.groups {
                    (lead_group(*status, leads, vm))
                }
            }
        },
    )
}

fn scrape_card() -> Markup {
    card(
        "Lead Scraping",
        html! {
            form method="post" action="/dashboard/scrape" class="actions" {
                input type="text" name="searchQuery" placeholder="plumbers in austin" required;
                input type="number" name="maxResults" min="1" max="100" value="20";
                button type="submit" { "Scrape" }
            }
        },
    )
}

fn flow_card(vm: &DashboardVm) -> Markup {
    card(
        "Run Full Flow",
        html! {
            p { "Scrape, draft messages for every sourced lead, then send to drafted leads." }
            form method="post" action="/dashboard/flow" {
                div class="actions" {
                    input type="text" name="searchQuery" placeholder="landscapers in dallas" required;
                    input type="text" name="campaignName" placeholder="Campaign name";
                    label { "Daily limit " input type="number" name="dailyEmailLimit" min="0" value=(vm.daily_email_limit); }
                }
                textarea name="aiPromptTemplate" rows="3" placeholder=(DEFAULT_TEMPLATE) {}
                div class="actions" { button type="submit" { "Run flow" } }
            }
        },
    )
}

fn add_lead_card() -> Markup {
    card(
        "Add Lead",
        html! {
            form method="post" action="/dashboard/leads" class="actions" {
                input type="text" name="name" placeholder="Business name" required;
                input type="text" name="phone" placeholder="Phone";
                input type="email" name="email" placeholder="Email";
                input type="text" name="website" placeholder="Website";
                input type="text" name="address" placeholder="Address";
                button type="submit" { "Add" }
            }
        },
    )
}

fn lead_group(status: LeadStatus, leads: &[Lead], vm: &DashboardVm) -> Markup {
    let form_id = format!("bulk-{}", status.as_str());
    html! {
        section class="card" {
            h3 { (status_badge(status)) " " (leads.len()) }

            form id=(form_id) method="post" action="/dashboard/generate" {
                div class="actions" {
                    input type="text" name="promptTemplate" placeholder="Prompt template (optional)" size="50";
                    button type="submit" formaction="/dashboard/generate" { "Generate messages" }
                    input type="text" name="subject" value=(vm.default_subject) size="35";
                    button type="submit" formaction="/dashboard/send" { "Send emails" }
                    a href=(format!("/leads/export?status={}", status.as_str())) { "Export" }
                }
            }

            table {
                thead {
                    tr {
                        th {}
                        th { "Name" }
                        th { "Location" }
                        th { "Contact" }
                        th { "Message" }
                        th {}
                    }
                }
                tbody {
                    @for lead in leads {
                        (lead_row(lead, &form_id))
                    }
                }
            }
        }
    }
}

/// Only plain web addresses become links.
fn web_link(website: &str) -> Option<&str> {
    let url = website.trim();
    let lower = url.to_ascii_lowercase();
    (lower.starts_with("http://") || lower.starts_with("https://")).then_some(url)
}

fn lead_row(lead: &Lead, form_id: &str) -> Markup {
    let id = lead.id.as_deref().unwrap_or_default();
    html! {
        tr {
            td { input type="checkbox" name="leadIds" value=(id) form=(form_id); }
            td {
                strong { (lead.name) }
                @if !lead.category_name.is_empty() { br; small { (lead.category_name) } }
            }
            td { (lead.city) @if !lead.state.is_empty() { ", " (lead.state) } }
            td {
                @if let Some(email) = lead.primary_email() { (email) br; }
                @if !lead.phone.is_empty() { (lead.phone) br; }
                @if let Some(url) = web_link(&lead.website) {
                    a href=(url) target="_blank" rel="noopener noreferrer" { "website" }
                } @else if !lead.website.is_empty() {
                    (lead.website)
                }
            }
            td {
                form method="post" action="/dashboard/leads/message" {
                    input type="hidden" name="leadId" value=(id);
                    textarea name="message" rows="3" { (lead.message) }
                    button type="submit" { "Save" }
                }
            }
            td {
                @if lead.status != LeadStatus::Deleted {
                    form method="post" action="/dashboard/leads/delete" {
                        input type="hidden" name="leadId" value=(id);
                        button type="submit" { "Delete" }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_follow_lifecycle_order_and_skip_empty() {
        let mut a = Lead::new("A");
        a.status = LeadStatus::Contacted;
        let b = Lead::new("B");
        let groups = DashboardVm::group(vec![a, b]);
        let order: Vec<LeadStatus> = groups.iter().map(|(s, _)| *s).collect();
        assert_eq!(order, vec![LeadStatus::Sourced, LeadStatus::Contacted]);
    }

    #[test]
    fn only_http_websites_are_linked() {
        let mut safe = Lead::new("Acme");
        safe.id = Some("rec1".into());
        safe.website = "https://acme.com".into();
        let html = lead_row(&safe, "f").into_string();
        assert!(html.contains(r#"href="https://acme.com""#));

        let mut hostile = Lead::new("Evil");
        hostile.id = Some("rec2".into());
        hostile.website = "javascript:alert(document.cookie)".into();
        let html = lead_row(&hostile, "f").into_string();
        assert!(!html.contains("href=\"javascript:"));
        assert!(html.contains("javascript:alert(document.cookie)"));
    }
}
