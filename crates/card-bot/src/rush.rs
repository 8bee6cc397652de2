//! Markdown rendering for Rush Duel cards
//!
//! Rush cards carry their own layout: LEGEND marker instead of paper
//! limits, MAXIMUM ATK, and requirement/effect sections.

use crate::card::RushCard;
use crate::limit_regulation::LimitRegulationVector;
use crate::render::{format_card_text, opt_num, opt_stat};

pub fn display(card: &RushCard, rush_vector: &LimitRegulationVector) -> String {
    let name = card.name.en.as_deref().unwrap_or("?");
    let yugipedia = match (card.konami_id, card.yugipedia_page_id) {
        (Some(konami_id), _) => format!(
            "https://yugipedia.com/wiki/{konami_id}?utm_source=cardbot&utm_medium=reddit"
        ),
        (None, Some(page_id)) => format!(
            "https://yugipedia.com/wiki/?curid={page_id}&utm_source=cardbot&utm_medium=reddit"
        ),
        (None, None) => format!(
            "https://yugipedia.com/wiki/{}?utm_source=cardbot&utm_medium=reddit",
            urlencoding::encode(name)
        ),
    };
    let rushcard = format!(
        "https://rushcard.io/card/?search={}&utm_source=cardbot&utm_medium=reddit",
        card.yugipedia_page_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| urlencoding::encode(name).into_owned())
    );

    let mut full_text = format!("## [{name}]({rushcard})\n");

    let mut description = String::new();
    if card.legend {
        description.push_str("__**LEGEND**__\n");
    } else if let Some(konami_id) = card.konami_id {
        let limit = rush_vector.get(konami_id).unwrap_or(3);
        description.push_str(&format!("^(**Limit**: {limit})  \n"));
    }

    let fusion = card
        .monster_type_line
        .as_deref()
        .is_some_and(|line| line.contains("Fusion"));

    if card.card_type == "Monster" {
        description.push_str(&format!(
            "^(**Type**: {})  \n",
            card.monster_type_line.as_deref().unwrap_or("?")
        ));
        description.push_str(&format!(
            "^(**Attribute**: {})  \n",
            card.attribute.as_deref().unwrap_or("?")
        ));
        description.push_str(&format!(
            "^(**Level**: {} **ATK**: {} **DEF**: {})  \n",
            opt_num(&card.level),
            opt_stat(&card.atk),
            opt_stat(&card.def)
        ));
        if card.maximum_atk.is_some() {
            description.push_str(&format!(
                "^(**MAXIMUM ATK**: {})  \n",
                opt_stat(&card.maximum_atk)
            ));
        }
        if let Some(condition) = &card.summoning_condition {
            description.push_str(&format!("\n{}", format_card_text(condition.en.as_deref())));
        }
        if let Some(materials) = &card.materials {
            description.push_str(&format!("\n{}", format_card_text(materials.en.as_deref())));
        }
        if fusion {
            // For non-Effect Fusion monsters the card text is effectively
            // the localised materials line
            if let Some(text) = &card.text {
                description.push_str(&format!("\n{}", format_card_text(text.en.as_deref())));
            }
        }

        full_text.push_str(&format!("{description}\n\n"));

        if let Some(requirement) = &card.requirement {
            full_text.push_str(&format!(
                "**[REQUIREMENT]**\n\n{}\n\n",
                format_card_text(requirement.en.as_deref())
            ));
            let effect_type = effect_heading(card.effect_types.as_deref());
            full_text.push_str(&format!(
                "**[{effect_type}]**\n\n{}\n\n",
                format_card_text(card.effect.as_ref().and_then(|e| e.en.as_deref()))
            ));
        } else if card.text.is_some() && !fusion {
            full_text.push_str(&format!(
                "**Card Text**\n\n{}",
                format_card_text(card.text.as_ref().and_then(|t| t.en.as_deref()))
            ));
        }
    } else {
        // Spells and Traps
        description.push_str("\n\n");
        description.push_str(&format!(
            "{} {}",
            card.property.as_deref().unwrap_or("?"),
            card.card_type
        ));
        full_text.push_str(&format!("{description}\n\n"));
        full_text.push_str(&format!(
            "**[REQUIREMENT]**\n\n{}\n\n",
            format_card_text(card.requirement.as_ref().and_then(|r| r.en.as_deref()))
        ));
        full_text.push_str(&format!(
            "**[EFFECT]**\n\n{}\n\n",
            format_card_text(card.effect.as_ref().and_then(|e| e.en.as_deref()))
        ));
    }

    full_text.push_str(&format!("[Yugipedia]({yugipedia})\n\n"));
    match card.konami_id {
        Some(konami_id) => full_text.push_str(&format!("^(Konami ID #{konami_id})")),
        None => full_text.push_str("^(Not yet released)"),
    }
    full_text
}

fn effect_heading(effect_types: Option<&[String]>) -> &'static str {
    let types = effect_types.unwrap_or_default();
    if types.iter().any(|t| t == "Continuous") {
        "CONTINUOUS EFFECT"
    } else if types.iter().any(|t| t == "Multi-Choice") {
        "MULTI-CHOICE EFFECT"
    } else {
        "EFFECT"
    }
}
