//! Markdown rendering of card records
//!
//! Pure functions of the card payload plus the current regulation
//! snapshots; no network access happens here.

#[cfg(test)]
#[path = "render_tests.rs"]
mod render_tests;

use once_cell::sync::Lazy;

use crate::card::{Card, OcgCard, Stat};
use crate::limit_regulation::LimitRegulationVector;
use crate::rush;

/// Signature appended to every reply.
pub const FOOTER: &str = "\n\n----\n\n^(Call cards with) ^({{Card Name}}) \
^(in a post or comment, or mention me anywhere on Reddit. Card data from the YAML Yugi project.)";

/// Static reply for mentions that carry no resolvable summons.
pub static HELP: Lazy<String> = Lazy::new(|| {
    format!(
        "Free and open source _Yu-Gi-Oh!_ bot. Use {{{{Card Name}}}} in your posts and \
comments to have me reply with card information.\n\nAlso works outside of Yu-Gi-Oh! \
subreddits if you mention me in the comment.{FOOTER}"
    )
});

/// One block per card joined by a rule, plus the signature footer.
pub fn display_cards(
    cards: &[Card],
    master_duel: &LimitRegulationVector,
    rush_vector: &LimitRegulationVector,
) -> String {
    let blocks: Vec<String> = cards
        .iter()
        .map(|card| match card {
            Card::Ocg(card) => ocg_display(card, master_duel),
            Card::Rush(card) => rush::display(card, rush_vector),
        })
        .collect();
    format!("{}{FOOTER}", blocks.join("\n\n----\n\n"))
}

/// Restriction level encoded by a paper-format label.
pub fn format_limit_regulation(label: Option<&str>) -> Option<u8> {
    match label {
        Some("Forbidden") => Some(0),
        Some("Limited") => Some(1),
        Some("Semi-Limited") => Some(2),
        Some("Unlimited") => Some(3),
        _ => None,
    }
}

/// Master Duel level for cards that exist there: the vector entry, or
/// unlimited (3) when the vector does not list the card.
fn master_duel_limit(card: &OcgCard, vector: &LimitRegulationVector) -> Option<u8> {
    if card.master_duel_rarity.is_none() {
        return None;
    }
    let konami_id = card.konami_id?;
    Some(vector.get(konami_id).unwrap_or(3))
}

fn master_duel_rarity_name(code: &str) -> &str {
    match code {
        "N" => "Common",
        "R" => "Rare",
        "SR" => "Super Rare",
        "UR" => "Ultra Rare",
        other => other,
    }
}

/// Reddit collapses single newlines; double them so paragraphs survive.
pub fn format_card_text(text: Option<&str>) -> String {
    match text {
        Some(text) if !text.is_empty() => text.replace('\n', "\n\n"),
        _ => "\u{200b}".to_string(),
    }
}

pub(crate) fn opt_stat(stat: &Option<Stat>) -> String {
    stat.as_ref().map(Stat::to_string).unwrap_or_else(|| "?".to_string())
}

pub(crate) fn opt_num(value: &Option<u32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "?".to_string())
}

/// Small-print identification line: password and Konami ID when known.
fn format_footer(card: &OcgCard) -> String {
    let text = match (card.password, card.konami_id) {
        (Some(password), Some(konami_id)) => {
            format!("Password: {password} | Konami ID #{konami_id}")
        }
        (None, Some(konami_id)) => format!("No password | Konami ID #{konami_id}"),
        (Some(password), None) => format!("Password: {password} | Not yet released"),
        (None, None) => match card.fake_password {
            Some(fake) => format!("Not yet released | Placeholder ID: {fake}"),
            None => "Not yet released".to_string(),
        },
    };
    format!("^({text})")
}

fn ocg_display(card: &OcgCard, master_duel: &LimitRegulationVector) -> String {
    let name = card.name.en.as_deref().unwrap_or("?");
    let yugipedia_page = card
        .konami_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| urlencoding::encode(name).into_owned());
    let yugipedia = format!(
        "https://yugipedia.com/wiki/{yugipedia_page}?utm_source=cardbot&utm_medium=reddit"
    );
    let ygoprodeck_term = card
        .password
        .map(|p| p.to_string())
        .unwrap_or_else(|| urlencoding::encode(name).into_owned());
    let ygoprodeck = format!(
        "https://ygoprodeck.com/card/?search={ygoprodeck_term}&utm_source=cardbot&utm_medium=reddit"
    );

    let mut full_text = format!("## [{name}]({ygoprodeck})\n");

    let mut links = String::new();
    if let Some(image) = card.images.as_ref().and_then(|images| images.first()) {
        let image_link = format!(
            "https://yugipedia.com/wiki/Special:Redirect/file/{}?utm_source=cardbot&utm_medium=reddit",
            image.image
        );
        links.push_str(&format!("[Card Image]({image_link}) | "));
    }
    if let Some(konami_id) = card.konami_id {
        // Official database; the rulings search is Japanese-only
        let official = format!(
            "https://www.db.yugioh-card.com/yugiohdb/card_search.action?ope=2&request_locale=en&cid={konami_id}"
        );
        let rulings = format!(
            "https://www.db.yugioh-card.com/yugiohdb/faq_search.action?ope=4&request_locale=ja&cid={konami_id}"
        );
        links.push_str(&format!(
            "[Official Konami DB]({official}) | [OCG Rulings]({rulings}) | "
        ));
    }
    links.push_str(&format!("[Yugipedia]({yugipedia}) | [YGOPRODECK]({ygoprodeck})"));

    let mut description = String::new();

    let limit_regulations = [
        ("TCG: ", format_limit_regulation(card.limit_regulation.tcg.as_deref())),
        ("OCG: ", format_limit_regulation(card.limit_regulation.ocg.as_deref())),
        ("Speed: ", card.limit_regulation.speed),
        ("MD: ", master_duel_limit(card, master_duel)),
    ];
    let limit_display = limit_regulations
        .iter()
        .filter_map(|(label, value)| value.map(|v| format!("{label}{v}")))
        .collect::<Vec<_>>()
        .join(" / ");
    if !limit_display.is_empty() {
        description.push_str(&format!("^(**Limit**: {limit_display})  \n"));
    }

    if let Some(code) = card.master_duel_rarity.as_deref() {
        description.push_str(&format!(
            "^(**Master Duel rarity**: {} &#40;{code}&#41;)  \n",
            master_duel_rarity_name(code)
        ));
    }

    if card.card_type == "Monster" {
        description.push_str(&format!(
            "^(**Type**: {})  \n",
            card.monster_type_line.as_deref().unwrap_or("?")
        ));
        description.push_str(&format!(
            "^(**Attribute**: {})  \n",
            card.attribute.as_deref().unwrap_or("?")
        ));

        if card.rank.is_some() {
            description.push_str(&format!(
                "^(**Rank**: {} **ATK**: {} **DEF**: {})",
                opt_num(&card.rank),
                opt_stat(&card.atk),
                opt_stat(&card.def)
            ));
        } else if let Some(arrows) = &card.link_arrows {
            description.push_str(&format!(
                "^(**Link Rating**: {} **ATK**: {} **Link Arrows**: {})",
                arrows.len(),
                opt_stat(&card.atk),
                arrows.concat()
            ));
        } else {
            description.push_str(&format!(
                "^(**Level**: {} **ATK**: {} **DEF**: {})",
                opt_num(&card.level),
                opt_stat(&card.atk),
                opt_stat(&card.def)
            ));
        }

        if let Some(scale) = card.pendulum_scale {
            description.push_str(&format!(" ^(**Pendulum Scale**: {scale} / {scale})"));
        }

        full_text.push_str(&format!("{description}\n\n"));

        if let Some(effect) = &card.pendulum_effect {
            full_text.push_str(&format!(
                "**Pendulum Effect**\n\n{}\n\n",
                format_card_text(effect.en.as_deref())
            ));
        }

        full_text.push_str(&format!(
            "**Card Text**\n\n{}",
            format_card_text(card.text.as_ref().and_then(|t| t.en.as_deref()))
        ));
    } else {
        // Spells and Traps
        description.push_str("\n\n");
        description.push_str(&format!(
            "{} {}",
            card.property.as_deref().unwrap_or("?"),
            card.card_type
        ));
        full_text.push_str(&format!(
            "{description}\n\n**Card Text**\n\n{}",
            format_card_text(card.text.as_ref().and_then(|t| t.en.as_deref()))
        ));
    }

    full_text.push_str(&format!("\n\n{links}\n\n{}", format_footer(card)));
    full_text
}
