mod dashboard_tests;
mod email_tests;
mod flow_tests;
mod health_tests;
mod leads_tests;
mod messages_tests;
mod scrape_tests;
