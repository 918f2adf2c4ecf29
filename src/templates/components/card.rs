use maud::{html, Markup};

pub fn card(title: &str, body: Markup) -> Markup {
    html! {
        section class="card" {
            h3 { (title) }
            (body)
        }
    }
}

pub fn stat_card(label: &str, value: usize) -> Markup {
    html! {
        div class="stat" {
            div { (label) }
            div class="value" { (value) }
        }
    }
}
