//! Embedded HTML templates.
//!
//! Templates ship inside the binary so the server has no working-directory
//! dependency.

use icondo_core::CondominiumDraft;
use serde::Serialize;
use tera::Tera;

pub const LIST_TEMPLATE: &str = "condominiums.html";
pub const FORM_TEMPLATE: &str = "condominium_form.html";

const TEMPLATES: [(&str, &str); 3] = [
    ("base.html", include_str!("../templates/base.html")),
    (LIST_TEMPLATE, include_str!("../templates/condominiums.html")),
    (FORM_TEMPLATE, include_str!("../templates/condominium_form.html")),
];

/// One input of the creation form.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub required: bool,
}

/// Inputs of the create/edit form, in display order.
pub const FORM_FIELDS: [FormField; 10] = [
    field("razao_social", "Razão Social", true),
    field("logradouro", "Logradouro", false),
    field("numend", "Número", false),
    field("complend", "Complemento", false),
    field("bairro", "Bairro", false),
    field("cidade", "Cidade", false),
    field("uf", "UF", false),
    field("cep", "CEP", false),
    field("telefone", "Telefone", false),
    field("cnpj", "CNPJ", false),
];

const fn field(name: &'static str, label: &'static str, required: bool) -> FormField {
    FormField {
        name,
        label,
        required,
    }
}

/// A form field together with the text it is pre-filled with.
#[derive(Debug, Clone, Serialize)]
pub struct FormInput {
    #[serde(flatten)]
    pub field: FormField,
    pub value: String,
}

/// Pairs every form field with its current value from `draft`.
pub fn form_inputs(draft: &CondominiumDraft) -> Vec<FormInput> {
    FORM_FIELDS
        .iter()
        .map(|field| FormInput {
            field: *field,
            value: field_value(draft, field.name).unwrap_or_default().to_string(),
        })
        .collect()
}

fn field_value<'a>(draft: &'a CondominiumDraft, name: &str) -> Option<&'a str> {
    match name {
        "razao_social" => Some(draft.razao_social.as_str()),
        "logradouro" => draft.logradouro.as_deref(),
        "numend" => draft.numend.as_deref(),
        "complend" => draft.complend.as_deref(),
        "bairro" => draft.bairro.as_deref(),
        "cidade" => draft.cidade.as_deref(),
        "uf" => draft.uf.as_deref(),
        "cep" => draft.cep.as_deref(),
        "telefone" => draft.telefone.as_deref(),
        "cnpj" => draft.cnpj.as_deref(),
        _ => None,
    }
}

/// Compiles every embedded template.
pub fn load_templates() -> tera::Result<Tera> {
    let mut tera = Tera::default();
    tera.add_raw_templates(TEMPLATES)?;
    Ok(tera)
}
