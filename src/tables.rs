//! Static lookup data: entity dispatch, classification entries, month
//! names and the default retention sets.

/// TEI P5 namespace placed on the document root.
pub const TEI_NAMESPACE: &str = "http://www.tei-c.org/ns/1.0";

/// Classification scheme of the NameTag entity hierarchy.
pub const NAMETAG_SCHEME: &str = "https://ufal.mff.cuni.cz/nametag/2/models";

/// Prefix of classification entry ids (`xml:id="nametag-gu"`).
pub const INTERP_ID_PREFIX: &str = "nametag-";

/// Prefix of back-references to classification entries (`ana="#nametag-gu"`).
pub const ANA_PREFIX: &str = "#nametag-";

/// Identifier the compiler records for itself in `encodingDesc`.
pub const CONVERTER_ID: &str = "TEIConverter";

/// The only supported document language.
pub const LANGUAGE: &str = "cze";

/// Licence text of the NameTag and UDPipe annotation layers.
pub const ANNOTATION_LICENCE: &str = "CC BY-NC-SA";

/// Default NameTag group-code prefixes kept in the merged document.
pub const NAME_TAG_DEFAULTS: &[&str] = &["a", "g", "i", "m", "n", "o", "p", "t"];

/// Default UDPipe token attributes kept in the merged document.
pub const UDPIPE_DEFAULTS: &[&str] = &["n", "lemma", "pos", "msd", "join"];

/// Default ALTO geometry fields kept in the merged document.
pub const ALTO_DEFAULTS: &[&str] = &["width", "height", "vpos", "hpos"];

/// Prefix marking ALTO provenance on token attributes (`alto-hpos`).
pub const ALTO_ATTR_PREFIX: &str = "alto-";

/// Back-reference value for a group code.
pub fn ana_for(code: &str) -> String {
    format!("{}{}", ANA_PREFIX, code)
}

/// Attribute computed from the token that opens a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Derived {
    /// No token-derived attribute
    None,
    /// `target` = token content (links)
    Target,
    /// `when="---DD"` from numeric token content
    Day,
    /// `when="--MM"` from the token lemma resolved as a month
    Month,
    /// `when` = token content
    Year,
}

/// How a NameTag group code is rendered as TEI markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementSpec {
    /// Element that becomes the new top of the span stack
    pub name: &'static str,
    /// Fixed attributes of that element
    pub attrs: &'static [(&'static str, &'static str)],
    /// Outer element wrapping `name` (two-level mappings)
    pub wrapper: Option<&'static str>,
    /// Token-derived attribute
    pub derived: Derived,
}

impl ElementSpec {
    const fn plain(name: &'static str) -> Self {
        Self {
            name,
            attrs: &[],
            wrapper: None,
            derived: Derived::None,
        }
    }

    const fn typed(name: &'static str, attrs: &'static [(&'static str, &'static str)]) -> Self {
        Self {
            name,
            attrs,
            wrapper: None,
            derived: Derived::None,
        }
    }

    const fn wrapped(wrapper: &'static str, name: &'static str) -> Self {
        Self {
            name,
            attrs: &[],
            wrapper: Some(wrapper),
            derived: Derived::None,
        }
    }

    const fn derived(name: &'static str, derived: Derived) -> Self {
        Self {
            name,
            attrs: &[],
            wrapper: None,
            derived,
        }
    }
}

/// Element opened for a code missing from [`ENTITY_TABLE`].
pub const GENERIC_GROUP: &str = "group";

const NUM: ElementSpec = ElementSpec::plain("num");
const BIBLIOGRAPHY: ElementSpec = ElementSpec::typed("objectName", &[("type", "bibliography")]);
const SETTLEMENT: ElementSpec = ElementSpec::wrapped("placeName", "settlement");
const OBJECT: ElementSpec = ElementSpec::plain("objectName");
const ORGANIZATION: ElementSpec = ElementSpec::plain("orgName");
const UNIT: ElementSpec = ElementSpec::plain("unit");
const PERSON: ElementSpec = ElementSpec::plain("persName");
const DATE: ElementSpec = ElementSpec::plain("date");

/// NameTag group code to TEI element dispatch.
pub static ENTITY_TABLE: &[(&str, ElementSpec)] = &[
    // numbers in addresses and numbers with a specific meaning
    ("ah", NUM),
    ("at", ElementSpec::typed("num", &[("type", "phone")])),
    ("az", ElementSpec::typed("num", &[("type", "zip")])),
    ("na", NUM),
    ("nb", NUM),
    ("nc", NUM),
    ("ni", NUM),
    ("ns", NUM),
    ("n_", NUM),
    ("no", ElementSpec::typed("num", &[("type", "ordinal")])),
    // bibliographic containers
    ("c", BIBLIOGRAPHY),
    ("C", BIBLIOGRAPHY),
    // geographical names
    ("gc", ElementSpec::wrapped("placeName", "country")),
    ("gh", ElementSpec::typed("geogName", &[("type", "water")])),
    ("gl", ElementSpec::typed("geogName", &[("type", "area")])),
    ("gq", SETTLEMENT),
    ("gu", SETTLEMENT),
    ("gr", ElementSpec::wrapped("placeName", "region")),
    ("gs", ElementSpec::wrapped("address", "street")),
    ("gt", ElementSpec::typed("geogName", &[("type", "continent")])),
    ("g_", ElementSpec::plain("placeName")),
    ("A", ElementSpec::plain("address")),
    // institutions and media
    ("ia", OBJECT),
    ("ic", ORGANIZATION),
    ("if", ORGANIZATION),
    ("io", ORGANIZATION),
    ("i_", ORGANIZATION),
    ("mn", ORGANIZATION),
    ("ms", ORGANIZATION),
    ("me", ElementSpec::plain("email")),
    ("mi", ElementSpec::derived("ref", Derived::Target)),
    // artefacts and things
    ("oa", ElementSpec::typed("objectName", &[("type", "artefact")])),
    ("oe", UNIT),
    ("om", UNIT),
    ("op", ElementSpec::typed("objectName", &[("type", "product")])),
    ("or", ElementSpec::typed("objectName", &[("type", "rule")])),
    ("o_", OBJECT),
    // personal names
    ("pc", ElementSpec::typed("objectName", &[("type", "population")])),
    ("pd", ElementSpec::plain("abbr")),
    ("pf", ElementSpec::plain("forename")),
    ("pm", ElementSpec::typed("forename", &[("type", "middle")])),
    ("pp", PERSON),
    ("P", PERSON),
    ("ps", ElementSpec::plain("surname")),
    ("p_", OBJECT),
    // time expressions
    ("t", DATE),
    ("T", DATE),
    ("td", ElementSpec::derived("date", Derived::Day)),
    ("tm", ElementSpec::derived("date", Derived::Month)),
    ("ty", ElementSpec::derived("date", Derived::Year)),
    ("tf", ElementSpec::typed("date", &[("type", "holiday")])),
    ("th", ElementSpec::plain("time")),
];

/// Look up the element spec of a group code.
pub fn entity_spec(code: &str) -> Option<&'static ElementSpec> {
    ENTITY_TABLE
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, spec)| spec)
}

/// NameTag classification entries rendered into `interpGrp`.
pub static CLASSIFICATION: &[(&str, &str)] = &[
    ("a", "ČÍSLA JAKO SOUČÁSTI ADRES"),
    ("ah", "číslo popisné"),
    ("at", "telefon, fax"),
    ("az", "PSČ"),
    ("g", "GEOGRAFICKÉ NÁZVY"),
    ("gc", "státní útvary"),
    ("gh", "vodní útvary"),
    ("gl", "přírodní oblasti / útvary"),
    ("gq", "části obcí, pomístní názvy"),
    ("gr", "menší územní jednotky"),
    ("gs", "ulice, náměstí"),
    ("gt", "kontinenty"),
    ("gu", "obce, hrady a zámky"),
    (
        "g_",
        "geografický název nespecifikovaného typu / nezařaditelný do ostatních typů",
    ),
    ("i", "NÁZVY INSTITUCÍ"),
    ("ia", "přednášky, konference, soutěže,..."),
    (
        "ic",
        "kulturní, vzdělávací a vědecké instituce, sportovní kluby,...",
    ),
    ("if", "firmy, koncerny, hotely,..."),
    (
        "io",
        "státní a mezinárodní instituce, politické strany a hnutí, náboženské skupiny",
    ),
    (
        "i_",
        "instituce nespecifikovaného typu / nezařaditelné do ostatních typů",
    ),
    ("m", "NÁZVY MÉDIÍ"),
    ("me", "e-mailové adresy"),
    ("mi", "internetové odkazy"),
    ("mn", "periodika, redakce, tiskové agentury"),
    ("ms", "rozhlasové a televizní stanice"),
    ("n", "ČÍSLA SE SPECIFICKÝM VÝZNAMEM"),
    ("na", "věk"),
    ("nc", "číslo s významem počtu"),
    ("nb", "číslo strany, kapitoly, oddílu, obrázku"),
    ("no", "číslo s významem pořadí"),
    ("ns", "sportovní skóre"),
    ("ni", "itemizátor"),
    (
        "n_",
        "číslo se specifickým významem, jehož typ nebyl vyčleněn jako samostatný / nelze identifikovat",
    ),
    ("o", "NÁZVY VĚCÍ"),
    ("oa", "kulturní artefakty (knihy, filmy stavby,...)"),
    ("oe", "měrné jednotky (zapsané zkratkou)"),
    ("om", "měny (zapsané zkratkou, symbolem)"),
    ("op", "výrobky"),
    ("or", "předpisy, normy,..., jejich sbírky"),
    (
        "o_",
        "názvy nespecifikovaného typu / nezařaditelné do ostatních typů",
    ),
    ("p", "JMÉNA OSOB"),
    ("pc", "obyvatelská jména"),
    ("pd", "titul (pouze zkratkou)"),
    ("pf", "křestní jméno"),
    ("pm", "druhé křestní jméno"),
    (
        "pp",
        "náboženské postavy, pohádkové a mytické postavy, personifikované vlastnosti",
    ),
    ("ps", "příjmení"),
    (
        "p_",
        "jméno osoby nespecifikovaného typu / nezařaditelné do ostatních typů",
    ),
    ("t", "ČASOVÉ ÚDAJE"),
    ("td", "den"),
    ("tf", "svátky a významné dny"),
    ("th", "hodina"),
    ("tm", "měsíc"),
    ("ty", "rok"),
];

/// Czech month names (lemma form) to two-digit month numbers.
pub static MONTHS: &[(&str, &str)] = &[
    ("leden", "01"),
    ("únor", "02"),
    ("březen", "03"),
    ("duben", "04"),
    ("květen", "05"),
    ("červen", "06"),
    ("červenec", "07"),
    ("srpen", "08"),
    ("září", "09"),
    ("říjen", "10"),
    ("listopad", "11"),
    ("prosinec", "12"),
];

/// Resolve a month lemma (case-insensitive) to its two-digit number.
pub fn month_number(lemma: &str) -> Option<&'static str> {
    let lemma = lemma.trim().to_lowercase();
    MONTHS
        .iter()
        .find(|(name, _)| *name == lemma)
        .map(|(_, number)| *number)
}
