use maud::{html, Markup, PreEscaped, DOCTYPE};

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; background: #f5f7fb; color: #1f2937; }
header { display: flex; align-items: center; justify-content: space-between; padding: 0.75rem 1.5rem;
         background: linear-gradient(90deg, #2563eb, #7c3aed); color: white; }
header a { color: white; text-decoration: none; margin-left: 1rem; }
main.container { max-width: 1200px; margin: 0 auto; padding: 1.5rem; }
.card { background: white; border-radius: 12px; padding: 1rem 1.25rem; margin-bottom: 1.25rem;
        box-shadow: 0 1px 3px rgba(0,0,0,0.08); }
.stats { display: grid; grid-template-columns: repeat(6, 1fr); gap: 1rem; margin-bottom: 1.25rem; }
.stat { background: white; border-radius: 12px; padding: 1rem; box-shadow: 0 1px 3px rgba(0,0,0,0.08); }
.stat .value { font-size: 1.6rem; font-weight: 700; }
.notice { background: #ecfdf5; border: 1px solid #10b981; padding: 0.6rem 1rem; border-radius: 8px; margin-bottom: 1rem; }
table { width: 100%; border-collapse: collapse; font-size: 0.9rem; }
th, td { text-align: left; padding: 0.4rem; border-bottom: 1px solid #e5e7eb; vertical-align: top; }
textarea { width: 100%; font-family: inherit; }
.badge { display: inline-block; padding: 0.1rem 0.5rem; border-radius: 999px; font-size: 0.75rem; font-weight: 600; }
.badge-sourced { background: #dbeafe; color: #1e40af; }
.badge-message_generated { background: #fef9c3; color: #854d0e; }
.badge-contacted { background: #f3e8ff; color: #6b21a8; }
.badge-replied { background: #dcfce7; color: #166534; }
.badge-converted { background: #d1fae5; color: #065f46; }
.badge-deleted, .badge-failed, .badge-bounced { background: #f3f4f6; color: #374151; }
.actions { display: flex; gap: 0.5rem; align-items: center; flex-wrap: wrap; margin: 0.5rem 0; }
"#;

pub fn desktop_layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(STYLE)) }
            }
            body {
                header {
                    h3 { "Lead Outreach" }
                    nav {
                        a href="/" { "Dashboard" }
                        a href="/leads/export" { "Export" }
                        a href="/health/config" { "Config" }
                    }
                }
                (content)
            }
        }
    }
}
