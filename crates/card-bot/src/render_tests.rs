//! Unit tests for card rendering

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::card::{Card, LimitRegulation, LocalizedText, OcgCard, RushCard, Stat};
    use crate::limit_regulation::LimitRegulationVector;
    use crate::render::{
        display_cards, format_card_text, format_limit_regulation, FOOTER, HELP,
    };
    use crate::rush;

    fn blue_eyes() -> OcgCard {
        OcgCard {
            name: LocalizedText::new("Blue-Eyes White Dragon"),
            card_type: "Monster".to_string(),
            password: Some(89_631_139),
            konami_id: Some(4007),
            fake_password: None,
            limit_regulation: LimitRegulation {
                tcg: Some("Unlimited".to_string()),
                ocg: Some("Unlimited".to_string()),
                speed: None,
            },
            master_duel_rarity: Some("UR".to_string()),
            monster_type_line: Some("Dragon / Normal".to_string()),
            attribute: Some("LIGHT".to_string()),
            level: Some(8),
            rank: None,
            link_arrows: None,
            atk: Some(Stat::Value(3000)),
            def: Some(Stat::Value(2500)),
            pendulum_scale: None,
            pendulum_effect: None,
            property: None,
            text: Some(LocalizedText::new(
                "This legendary dragon is a powerful engine of destruction.",
            )),
            images: None,
        }
    }

    fn empty_vector() -> LimitRegulationVector {
        LimitRegulationVector::preloaded(HashMap::new())
    }

    #[test]
    fn test_limit_regulation_labels() {
        assert_eq!(format_limit_regulation(Some("Forbidden")), Some(0));
        assert_eq!(format_limit_regulation(Some("Limited")), Some(1));
        assert_eq!(format_limit_regulation(Some("Semi-Limited")), Some(2));
        assert_eq!(format_limit_regulation(Some("Unlimited")), Some(3));
        assert_eq!(format_limit_regulation(Some("anything else")), None);
        assert_eq!(format_limit_regulation(None), None);
    }

    #[test]
    fn test_format_card_text_doubles_newlines() {
        assert_eq!(format_card_text(Some("a\nb")), "a\n\nb");
        assert_eq!(format_card_text(None), "\u{200b}");
        assert_eq!(format_card_text(Some("")), "\u{200b}");
    }

    #[test]
    fn test_monster_render_is_byte_stable() {
        let cards = [Card::Ocg(blue_eyes())];
        let md = empty_vector();
        let rush = empty_vector();
        let first = display_cards(&cards, &md, &rush);
        let second = display_cards(&cards, &md, &rush);
        assert_eq!(first, second);
    }

    #[test]
    fn test_monster_render_contents() {
        let cards = [Card::Ocg(blue_eyes())];
        let text = display_cards(&cards, &empty_vector(), &empty_vector());
        assert!(text.starts_with("## [Blue-Eyes White Dragon]"));
        assert!(text.contains("^(**Limit**: TCG: 3 / OCG: 3 / MD: 3)"));
        assert!(text.contains("^(**Master Duel rarity**: Ultra Rare &#40;UR&#41;)"));
        assert!(text.contains("^(**Type**: Dragon / Normal)"));
        assert!(text.contains("^(**Level**: 8 **ATK**: 3000 **DEF**: 2500)"));
        assert!(text.contains("**Card Text**"));
        assert!(text.contains("Password: 89631139 | Konami ID #4007"));
        assert!(text.contains("[Official Konami DB]"));
        assert!(text.ends_with(FOOTER));
    }

    #[test]
    fn test_master_duel_level_prefers_vector_entry() {
        let vector = LimitRegulationVector::preloaded([(4007u64, 1u8)].into_iter().collect());
        let text = display_cards(&[Card::Ocg(blue_eyes())], &vector, &empty_vector());
        assert!(text.contains("MD: 1"));
    }

    #[test]
    fn test_monster_without_md_rarity_omits_md_entry() {
        let mut card = blue_eyes();
        card.master_duel_rarity = None;
        let text = display_cards(&[Card::Ocg(card)], &empty_vector(), &empty_vector());
        assert!(text.contains("^(**Limit**: TCG: 3 / OCG: 3)"));
        assert!(!text.contains("MD:"));
    }

    #[test]
    fn test_spell_render_uses_property_line() {
        let card = OcgCard {
            name: LocalizedText::new("Mystical Space Typhoon"),
            card_type: "Spell".to_string(),
            password: Some(5_318_639),
            konami_id: Some(4861),
            fake_password: None,
            limit_regulation: LimitRegulation::default(),
            master_duel_rarity: None,
            monster_type_line: None,
            attribute: None,
            level: None,
            rank: None,
            link_arrows: None,
            atk: None,
            def: None,
            pendulum_scale: None,
            pendulum_effect: None,
            property: Some("Quick-Play".to_string()),
            text: Some(LocalizedText::new("Target 1 Spell/Trap on the field; destroy it.")),
            images: None,
        };
        let text = display_cards(&[Card::Ocg(card)], &empty_vector(), &empty_vector());
        assert!(text.contains("Quick-Play Spell"));
        assert!(!text.contains("**Attribute**"));
    }

    #[test]
    fn test_link_monster_render() {
        let mut card = blue_eyes();
        card.level = None;
        card.def = None;
        card.link_arrows = Some(vec!["↙".to_string(), "↘".to_string()]);
        let text = display_cards(&[Card::Ocg(card)], &empty_vector(), &empty_vector());
        assert!(text.contains("**Link Rating**: 2"));
        assert!(text.contains("**Link Arrows**: ↙↘"));
    }

    #[test]
    fn test_two_cards_joined_by_rule() {
        let cards = [Card::Ocg(blue_eyes()), Card::Ocg(blue_eyes())];
        let text = display_cards(&cards, &empty_vector(), &empty_vector());
        assert!(text.contains("\n\n----\n\n"));
        assert_eq!(text.matches("## [Blue-Eyes White Dragon]").count(), 2);
    }

    #[test]
    fn test_help_text_ends_with_footer() {
        assert!(HELP.ends_with(FOOTER));
        assert!(HELP.contains("{{Card Name}}"));
    }

    fn rush_monster() -> RushCard {
        RushCard {
            name: LocalizedText::new("Sevens Road Magician"),
            card_type: "Monster".to_string(),
            konami_id: Some(15150),
            yugipedia_page_id: Some(987_654),
            legend: false,
            monster_type_line: Some("Spellcaster / Effect".to_string()),
            attribute: Some("DARK".to_string()),
            level: Some(7),
            atk: Some(Stat::Value(2100)),
            def: Some(Stat::Value(1500)),
            maximum_atk: None,
            summoning_condition: None,
            materials: None,
            requirement: Some(LocalizedText::new("You can send the top card of your Deck to the GY.")),
            effect: Some(LocalizedText::new("This card gains 300 ATK for each Attribute in your GY.")),
            effect_types: Some(vec!["Continuous".to_string()]),
            property: None,
            text: None,
        }
    }

    #[test]
    fn test_rush_render_limit_and_effect_heading() {
        let rush_vector = LimitRegulationVector::preloaded([(15150u64, 2u8)].into_iter().collect());
        let text = rush::display(&rush_monster(), &rush_vector);
        assert!(text.starts_with("## [Sevens Road Magician]"));
        assert!(text.contains("^(**Limit**: 2)"));
        assert!(text.contains("**[REQUIREMENT]**"));
        assert!(text.contains("**[CONTINUOUS EFFECT]**"));
        assert!(text.contains("^(Konami ID #15150)"));
    }

    #[test]
    fn test_rush_legend_replaces_limit_line() {
        let mut card = rush_monster();
        card.legend = true;
        let text = rush::display(&card, &LimitRegulationVector::preloaded(HashMap::new()));
        assert!(text.contains("__**LEGEND**__"));
        assert!(!text.contains("**Limit**"));
    }

    #[test]
    fn test_rush_unlisted_card_defaults_to_unlimited() {
        let text = rush::display(&rush_monster(), &LimitRegulationVector::preloaded(HashMap::new()));
        assert!(text.contains("^(**Limit**: 3)"));
    }
}
