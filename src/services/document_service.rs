// src/services/document_service.rs

use std::{path::PathBuf, sync::Arc};

use genpdf::{elements, style, Alignment, Element};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    common::error::AppError,
    db::Repository,
    models::{
        company::Company,
        crm::{Client, Supplier},
        invoice::{Invoice, InvoiceItem, SupplierInvoice, TaxBreakdown},
    },
    services::line_items::{tax_breakdown, TAX_RATE},
};

// Contraparte impressa no bloco "Cliente"/"Fornecedor"
struct PartyBlock {
    label: &'static str,
    name: String,
    lines: Vec<String>,
}

// Tudo o que o PDF precisa, já calculado
struct PrintableInvoice<'a> {
    title: &'static str,
    number: &'a str,
    date: String,
    due_date: String,
    status: String,
    notes: Option<&'a str>,
    items: &'a [InvoiceItem],
    total: Decimal,
    // Só faturas de cliente
    tax: Option<TaxBreakdown>,
}

#[derive(Clone)]
pub struct DocumentService {
    companies: Arc<dyn Repository<Company>>,
    clients: Arc<dyn Repository<Client>>,
    suppliers: Arc<dyn Repository<Supplier>>,
    fonts_dir: PathBuf,
}

impl DocumentService {
    pub fn new(
        companies: Arc<dyn Repository<Company>>,
        clients: Arc<dyn Repository<Client>>,
        suppliers: Arc<dyn Repository<Supplier>>,
        fonts_dir: PathBuf,
    ) -> Self {
        Self { companies, clients, suppliers, fonts_dir }
    }

    pub async fn invoice_pdf(&self, invoice: &Invoice) -> Result<Vec<u8>, AppError> {
        let company = self.companies.find_by_id(invoice.company_id).await?;
        // Cliente apagado: a fatura continua imprimível
        let party = match self.clients.find_by_id(invoice.client_id).await? {
            Some(c) => PartyBlock {
                label: "Client",
                name: c.name,
                lines: [c.email, c.phone, c.address].into_iter().flatten().collect(),
            },
            None => PartyBlock { label: "Client", name: "-".into(), lines: Vec::new() },
        };

        let printable = PrintableInvoice {
            title: "INVOICE",
            number: &invoice.number,
            date: invoice.date.format("%d/%m/%Y").to_string(),
            due_date: invoice.due_date.format("%d/%m/%Y").to_string(),
            status: status_label(&invoice.status),
            notes: invoice.notes.as_deref(),
            items: &invoice.items,
            total: invoice.total_amount,
            tax: Some(tax_breakdown(invoice.total_amount)),
        };

        self.render(company.as_ref(), &party, &printable)
    }

    pub async fn supplier_invoice_pdf(&self, invoice: &SupplierInvoice) -> Result<Vec<u8>, AppError> {
        let company = self.companies.find_by_id(invoice.company_id).await?;
        let party = match self.suppliers.find_by_id(invoice.supplier_id).await? {
            Some(s) => PartyBlock {
                label: "Supplier",
                name: s.name,
                lines: [s.contact_person, s.email, s.phone, s.address].into_iter().flatten().collect(),
            },
            None => PartyBlock { label: "Supplier", name: "-".into(), lines: Vec::new() },
        };

        let printable = PrintableInvoice {
            title: "SUPPLIER INVOICE",
            number: &invoice.number,
            date: invoice.date.format("%d/%m/%Y").to_string(),
            due_date: invoice.due_date.format("%d/%m/%Y").to_string(),
            status: status_label(&invoice.status),
            notes: invoice.notes.as_deref(),
            items: &invoice.items,
            total: invoice.total_amount,
            tax: None,
        };

        self.render(company.as_ref(), &party, &printable)
    }

    fn render(&self, company: Option<&Company>, party: &PartyBlock, invoice: &PrintableInvoice<'_>) -> Result<Vec<u8>, AppError> {
        // Carrega a fonte da pasta configurada
        let font_family = genpdf::fonts::from_files(&self.fonts_dir, "Roboto", None)
            .map_err(|_| AppError::FontNotFound(self.fonts_dir.display().to_string()))?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(format!("{} {}", invoice.title, invoice.number));
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        // --- EMPRESA ---
        match company {
            Some(company) => {
                doc.push(elements::Paragraph::new(company.name.clone()).styled(style::Style::new().bold().with_font_size(18)));
                let contact = [&company.tax_id, &company.email, &company.phone, &company.address];
                for line in contact.into_iter().flatten() {
                    doc.push(elements::Paragraph::new(line.clone()).styled(style::Style::new().with_font_size(10)));
                }
            }
            None => {
                doc.push(elements::Paragraph::new("-").styled(style::Style::new().bold().with_font_size(18)));
            }
        }

        doc.push(elements::Break::new(1.5));

        // --- FATURA / CONTRAPARTE ---
        doc.push(
            elements::Paragraph::new(format!("{} {}", invoice.title, invoice.number))
                .styled(style::Style::new().bold().with_font_size(14)),
        );
        doc.push(elements::Paragraph::new(format!("Date: {}", invoice.date)));
        doc.push(elements::Paragraph::new(format!("Due date: {}", invoice.due_date)));
        doc.push(elements::Paragraph::new(format!("Status: {}", invoice.status)));
        doc.push(elements::Break::new(1));

        doc.push(elements::Paragraph::new(format!("{}: {}", party.label, party.name)).styled(style::Style::new().bold()));
        for line in &party.lines {
            doc.push(elements::Paragraph::new(line.clone()).styled(style::Style::new().with_font_size(10)));
        }

        doc.push(elements::Break::new(2));

        // --- TABELA DE ITENS ---
        // Pesos das colunas: Descrição (4), Qtd (1), Preço (2), Total (2)
        let mut table = elements::TableLayout::new(vec![4, 1, 2, 2]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        let style_bold = style::Style::new().bold();
        table
            .row()
            .element(elements::Paragraph::new("Description").styled(style_bold))
            .element(elements::Paragraph::new("Qty").styled(style_bold))
            .element(elements::Paragraph::new("Unit price").styled(style_bold))
            .element(elements::Paragraph::new("Amount").styled(style_bold))
            .push()
            .map_err(|e| AppError::DocumentError(e.to_string()))?;

        for item in invoice.items {
            table
                .row()
                .element(elements::Paragraph::new(item.description.clone()))
                .element(elements::Paragraph::new(format!("{}", item.quantity.normalize())))
                .element(elements::Paragraph::new(format!("{:.2}", item.unit_price)))
                .element(elements::Paragraph::new(format!("{:.2}", item.amount)))
                .push()
                .map_err(|e| AppError::DocumentError(e.to_string()))?;
        }

        doc.push(table);
        doc.push(elements::Break::new(2));

        // --- TOTAIS ---
        let mut totals = vec![format!("Total: {:.2}", invoice.total)];
        if let Some(tax) = invoice.tax {
            totals.push(format!("Tax ({}%): {:.2}", (TAX_RATE * Decimal::from(100)).normalize(), tax.tax));
            totals.push(format!("Grand total: {:.2}", tax.grand_total));
        }
        for line in totals {
            let mut paragraph = elements::Paragraph::new(line);
            paragraph.set_alignment(Alignment::Right);
            doc.push(paragraph.styled(style::Style::new().bold().with_font_size(12)));
        }

        if let Some(notes) = invoice.notes {
            doc.push(elements::Break::new(2));
            doc.push(elements::Paragraph::new(notes.to_string()).styled(style::Style::new().italic().with_font_size(8)));
        }

        // Renderiza para Buffer (Memória)
        let mut buffer = Vec::new();
        doc.render(&mut buffer).map_err(|e| AppError::DocumentError(e.to_string()))?;

        Ok(buffer)
    }
}

fn status_label<S: Serialize>(status: &S) -> String {
    serde_json::to_value(status)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}
