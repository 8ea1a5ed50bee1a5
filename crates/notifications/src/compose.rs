//! Plain-text quote request sent to a matched supplier.

use std::fmt::Write as _;

use pharmacie_inventory::Item;
use pharmacie_suppliers::{CategoryLines, Supplier};

/// Subject line of every resupply notification.
pub const SUBJECT: &str = "Demande de devis de réapprovisionnement - Pharmacie Centrale";

const PREAMBLE: &str = "Nous vous contactons car certains médicaments de nos stocks nécessitent un réapprovisionnement.\n\
Vous trouverez ci-dessous la liste des médicaments concernés, classés par catégorie :\n\n";

const CLOSING: &str = "Merci de bien vouloir nous transmettre un devis de réapprovisionnement pour ces médicaments.\n\n\
Cordialement,\n\
La Pharmacie Centrale";

/// One line per item: `  - <name> (stock: <on hand>, seuil: <threshold>)`.
pub fn item_line(item: &Item) -> String {
    format!(
        "  - {} (stock: {}, seuil: {})",
        item.name(),
        item.on_hand(),
        item.threshold()
    )
}

/// Render the notification body for one supplier.
///
/// One `=== label ===` block per category, in the mapping's order, each
/// followed by its item lines and a blank line. Output depends only on the
/// inputs, so composing twice yields identical bytes.
pub fn compose(supplier: &Supplier, categories: &CategoryLines) -> String {
    let mut body = String::new();

    // Writing into a String cannot fail.
    let _ = write!(body, "Bonjour {},\n\n", supplier.name());
    body.push_str(PREAMBLE);

    for (label, lines) in categories.iter() {
        let _ = writeln!(body, "=== {label} ===");
        for line in lines {
            body.push_str(line);
            body.push('\n');
        }
        body.push('\n');
    }

    body.push_str(CLOSING);
    body
}
