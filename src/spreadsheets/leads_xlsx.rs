use crate::domain::list_field::join_list;
use crate::domain::{Lead, LeadStatus};
use crate::errors::ServerError;
use crate::responses::{xlsx_response, ResultResp};
use rust_xlsxwriter::{Format, Workbook, Worksheet};

// Same column order as the leads table import template.
const HEADERS: [&str; 32] = [
    "Id",
    "Name",
    "Phone",
    "Website",
    "Address",
    "City",
    "PostalCode",
    "State",
    "CountryCode",
    "CategoryName",
    "Neighborhood",
    "Street",
    "Latitude",
    "Longitude",
    "TotalScore",
    "PlaceId",
    "ReviewsCount",
    "ImagesCount",
    "ImageUrl",
    "Domain",
    "Emails",
    "LinkedIns",
    "Twitters",
    "Instagrams",
    "Facebooks",
    "Youtubes",
    "Tiktoks",
    "Pinterests",
    "Discords",
    "Status",
    "Message",
    "Created At",
];

enum Cell<'a> {
    Text(&'a str),
    Owned(String),
    Number(Option<f64>),
}

fn write_cell(ws: &mut Worksheet, row: u32, col: u16, cell: Cell<'_>) -> Result<(), ServerError> {
    let result = match cell {
        Cell::Text(s) => ws.write_string(row, col, s).map(|_| ()),
        Cell::Owned(s) => ws.write_string(row, col, s).map(|_| ()),
        Cell::Number(Some(n)) => ws.write_number(row, col, n).map(|_| ()),
        Cell::Number(None) => Ok(()),
    };
    result.map_err(|e| {
        ServerError::XlsxError(format!("Failed to write {} (row {row}): {e}", HEADERS[col as usize]))
    })
}

fn lead_cells(lead: &Lead) -> Vec<Cell<'_>> {
    let mut cells = vec![
        Cell::Text(lead.id.as_deref().unwrap_or("")),
        Cell::Text(&lead.name),
        Cell::Text(&lead.phone),
        Cell::Text(&lead.website),
        Cell::Text(&lead.address),
        Cell::Text(&lead.city),
        Cell::Text(&lead.postal_code),
        Cell::Text(&lead.state),
        Cell::Text(&lead.country_code),
        Cell::Text(&lead.category_name),
        Cell::Text(&lead.neighborhood),
        Cell::Text(&lead.street),
        Cell::Number(lead.latitude),
        Cell::Number(lead.longitude),
        Cell::Number(lead.total_score),
        Cell::Text(&lead.place_id),
        Cell::Number(lead.reviews_count.map(|n| n as f64)),
        Cell::Number(lead.images_count.map(|n| n as f64)),
        Cell::Text(&lead.image_url),
        Cell::Text(&lead.domain),
        Cell::Owned(join_list(&lead.emails)),
    ];
    cells.extend(lead.social.columns().into_iter().map(|(_, v)| Cell::Owned(join_list(v))));
    cells.push(Cell::Text(lead.status.as_str()));
    cells.push(Cell::Text(&lead.message));
    cells.push(Cell::Owned(
        lead.created_at.map(|t| t.to_rfc3339()).unwrap_or_default(),
    ));
    cells
}

/// Build the workbook bytes for a set of leads.
pub fn leads_workbook(leads: &[Lead]) -> Result<Vec<u8>, ServerError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let bold = Format::new().set_bold();

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &bold)
            .map_err(|e| ServerError::XlsxError(format!("Failed to write header '{header}': {e}")))?;
    }

    for (i, lead) in leads.iter().enumerate() {
        let r = (i + 1) as u32;
        for (col, cell) in lead_cells(lead).into_iter().enumerate() {
            write_cell(worksheet, r, col as u16, cell)?;
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|e| ServerError::XlsxError(format!("Failed to save workbook: {e}")))
}

pub fn export_leads_xlsx(leads: &[Lead], status: Option<LeadStatus>) -> ResultResp {
    let buffer = leads_workbook(leads)?;
    let filename = match status {
        Some(s) => format!("leads_{}.xlsx", s.as_str()),
        None => "leads.xlsx".to_string(),
    };
    xlsx_response(buffer, &filename)
}
