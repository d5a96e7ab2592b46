//! Name and value vocabulary of the realty endpoints.

use crate::error::ConfigError;
use crate::mapping::{MappingEntry, MappingGroup, MappingTable};

/// Top-level request parameters shared by all realty operations.
const PARAMS: &[(&str, &str)] = &[
    ("limit", "Limit"),
    ("offset", "Offset"),
    ("lang", "culture"),
    ("with_projects", "alleProjektObjekte"),
    ("id", "objekt_id"),
    ("all", "alle"),
    ("country", "land"),
    ("federal_state", "bundesland"),
    ("salutation_id", "anrede_id"),
    ("title", "titel"),
    ("first_name", "vorname"),
    ("last_name", "nachname"),
    ("email", "email"),
    ("phone", "tel"),
    ("message", "message"),
    ("street", "strasse"),
    ("zip_code", "plz"),
    ("location", "ort"),
];

/// Fields of the list `filter` group.
const FILTER: &[(&str, &str)] = &[
    ("price", "preis"),
    ("price_per_sqm", "preis_per_m2"),
    ("type_id", "objektart_id"),
    ("sub_type_id", "subobjektart_id"),
    ("tag", "tagname"),
    ("zip_code", "plz"),
    ("rooms", "zimmer"),
    ("number", "objektnummer"),
    ("area", "flaeche"),
    ("living_area", "wohnflaeche"),
    ("floor_area", "nutzflaeche"),
    ("surface_area", "grundflaeche"),
    ("keyword", "stichwort"),
    ("country_id", "land_id"),
    ("federal_state_id", "bundesland_id"),
    ("status_id", "objekt_status_id"),
    ("project_id", "projekt_id"),
    ("system_type", "realty_type"),
    ("parent_id", "parent_id"),
    ("rent", "miete"),
    ("purcase", "kauf"),
    ("updated_at", "aktualisiert_am"),
];

/// Response fields of a realty record.
const GENERAL: &[(&str, &str)] = &[
    ("usage", "nutzungsart"),
    ("apartment", "wohnung"),
    ("user_defined_simplefield", "user_defined_simplefield"),
    ("price", "preis"),
    ("first_image", "erstes_bild"),
    ("second_image", "zweites_bild"),
    ("yield_realty", "zinshaus_renditeobjekt"),
    ("user_defined_anyfield", "user_defined_anyfield"),
    ("ji_kategorie", "ji_kategorie"),
    ("sales_area", "verkaufsflaeche"),
    ("house", "haus"),
    ("geo", "geo"),
    ("living", "wohnen"),
    ("business", "gewerbe"),
    ("investment", "anlage"),
    ("purcase", "kauf"),
    ("rent", "miete_pacht"),
    ("field_name", "feldname"),
    ("apartment_type", "wohnungtyp"),
    ("interest_type", "zins_typ"),
    ("house_type", "haustyp"),
    ("id", "id"),
    ("property_number", "objektnummer"),
    ("teaser", "dreizeiler"),
    ("proximity", "naehe"),
    ("description", "objektbeschreibung"),
    ("other_information", "sonstige_angaben"),
    ("tier", "etage"),
    ("door_number", "tuernummer"),
    ("zip_code", "plz"),
    ("place", "ort"),
    ("purcase_price", "kaufpreis"),
    ("purcase_price_net", "kaufpreisnetto"),
    ("purcase_price_vat", "kaufpreis_ust"),
    ("total_rent", "gesamtmiete"),
    ("purcase_price_per_sqm", "kaufpreis_pro_qm"),
    ("rent_per_sqm_from", "mietpreis_pro_qm_von"),
    ("rent_per_sqm", "mietpreis_pro_qm"),
    ("floor_area_from", "teilbar_ab"),
    ("floor_area", "nutzflaeche"),
    ("surface_area", "grundflaeche"),
    ("living_area", "wohnflaeche"),
    ("total_area", "gesamtflaeche"),
    ("project_id", "projekt_id"),
    ("status", "status"),
    ("status_id", "status_id"),
    ("occupancy", "bewohnt"),
    ("marketing_type", "vermarktungsart"),
    ("realty_type", "objektart"),
    ("realty_type_id", "objektart_id"),
    ("realty_type_name", "objektart_name"),
    ("sub_realty_type", "sub_objektart"),
    ("sub_realty_type_id", "sub_objektart_id"),
    ("sub_realty_type_name", "sub_objektart_name"),
    ("equipment_description", "ausstattung_beschreibung"),
    ("latitude", "geokoordinaten_breitengrad"),
    ("longitude", "geokoordinaten_laengengrad"),
    ("latitude_precise", "geokoordinaten_breitengrad_exakt"),
    ("longitude_precise", "geokoordinaten_laengengrad_exakt"),
    ("orientation", "ausrichtung"),
    ("street", "strasse"),
    ("house_number", "hausnummer"),
    ("federal_state", "bundesland"),
    ("country", "land"),
    ("hallway", "flur"),
    ("land_parcel", "flurstueck"),
    ("district", "gemarkung"),
    ("regional_addition", "regionaler_zusatz"),
    ("net_rent", "nettokaltmiete"),
    ("additional_charges", "nebenkosten"),
    ("heating_costs", "heizkosten"),
    ("currency", "waehrung"),
    ("surety", "kaution"),
    ("surety_text", "kaution_text"),
    ("compensation", "abstand"),
    ("build_subsidies", "wohnbaufoerderung"),
    ("yield", "rendite"),
    ("net_earning_monthly", "nettoertrag_monatlich"),
    ("net_earning_yearly", "nettoertrag_jaehrlich"),
    ("total_rent_vat", "gesamtmiete_ust"),
    ("additional_costs", "zusatzkosten"),
    ("transfer_tax", "grunderwerbssteuer"),
    ("land_registration", "grundbucheintragung"),
    ("attachments", "anhaenge"),
    ("year_built", "baujahr"),
    ("age", "alter"),
    ("infrastructure_provision", "infrastruktur_provision"),
    ("condition", "zustand"),
    ("equipment", "ausstattung"),
    ("room_count", "anzahl_zimmer"),
    ("bathroom_count", "anzahl_badezimmer"),
    ("toilet_room_count", "anzahl_sep_wc"),
    ("balcony_terrace_count", "anzahl_balkon_terrassen"),
    ("balcony_terrace_area", "balkon_terrasse_flaeche"),
    ("terrace_count", "anzahl_terrassen"),
    ("garden_area", "gartenflaeche"),
    ("cellar_area", "kellerflaeche"),
    ("office_area", "bueroflaeche"),
    ("storage_area", "lagerflaeche"),
    ("loggia_count", "anzahl_loggias"),
    ("loggia_area", "loggias_flaeche"),
    ("balcony_area", "balkons_flaeche"),
    ("terrace_area", "terrassen_flaeche"),
    ("garage_count", "anzahl_garagen"),
    ("garage_area", "garagen_flaeche"),
    ("parking_count", "anzahl_stellplaetze"),
    ("parking_area", "stellplatz_flaeche"),
    ("store_room_count", "anzahl_abstellraum"),
    ("contract_establishment_costs", "vertragerrichtungsgebuehr"),
    ("commission", "aussen_courtage"),
    ("locality", "lage"),
    ("categories", "objektkategorie"),
    ("available_from", "verfuegbar_von"),
    ("rent_duration", "mietdauer"),
    ("rent_duration_type", "art_mietdauer"),
    ("buildable_area", "verbaubare_flaeche"),
    ("energy_pass", "energiepass"),
    ("contact", "kontaktperson"),
    ("freetext1", "justimmo_freitext1"),
    ("freetext2", "justimmo_freitext2"),
    ("freetext3", "justimmo_freitext3"),
    ("cost_explanation", "freitext_preis"),
    ("style_of_building_id", "bauart_id"),
    ("procured_at", "vermittelt_am"),
    ("created_at", "erstellt_am"),
    ("updated_at", "aktualisiert_am"),
    ("stair", "stiege"),
    ("realty_system_type", "realty_system_type"),
    ("parent_id", "parent_id"),
    ("show_in_search", "ji_anzeige_in_suchergebnis"),
    ("rent_vat", "miete_ust"),
    ("rent_vat_type", "art_miete_ust"),
    ("rent_gross", "bruttowert_miete"),
    ("rent_vat_value", "miete_ust_wert"),
    ("rent_vat_input", "miete_ust_eingabe"),
    ("is_reference", "ji_is_reference"),
    ("operation_cost_per_sqm", "betriebskosten_pro_qm"),
    ("tier_count", "anzahl_etagen"),
    ("thermal_heat_requirement_value", "epass_hwbwert"),
    ("thermal_heat_requirement_class", "epass_hwbklasse"),
    ("energy_efficiency_factor_value", "epass_fgeewert"),
    ("energy_efficiency_factor_class", "epass_fgeeklasse"),
];

/// Build the realty mapping table.
///
/// # Errors
///
/// `ConfigError` if the vocabulary above ever stops being one-to-one.
pub fn mapping_table() -> Result<MappingTable, ConfigError> {
    MappingTable::builder()
        .pairs(MappingGroup::Params, PARAMS)
        .entry(
            MappingGroup::Params,
            MappingEntry::new("orderby", "orderby")
                .value("price", "preis")
                .value("zip_code", "plz")
                .value("number", "objektnummer")
                .value("created_at", "erstellt_am")
                .value("updated_at", "aktualisiert_am"),
        )
        .entry(
            MappingGroup::Params,
            MappingEntry::new("ordertype", "ordertype").value("asc", "ASC").value("desc", "DESC"),
        )
        .entry(
            MappingGroup::Params,
            MappingEntry::new("picturesize", "picturesize")
                .value("small_unbranded", "small")
                .value("small2_unbranded", "s220x155")
                .value("small3_unbranded", "s312x208"),
        )
        .pairs(MappingGroup::Filter, FILTER)
        .pairs(MappingGroup::General, GENERAL)
        .entry(MappingGroup::General, MappingEntry::new("title", "titel").alias("objekttitel"))
        .entry(
            MappingGroup::General,
            MappingEntry::new("balcony_count", "anzahl_balkone").alias("anzahl_balkons"),
        )
        .build()
}
