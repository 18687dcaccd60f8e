//! Built-in catalog of Portuguese suppliers.
//!
//! Order matters: the tax ID scan, keyword tie-breaks and template matching
//! all walk suppliers in this order.

use super::{SharedTaxId, TaxIdVariant};
use crate::models::supplier::{HeaderRegion, SupplierProfile};

fn supplier(
    name: &str,
    display_name: &str,
    tax_id: &str,
    keywords: &[&str],
    (x, y, width, height): (u32, u32, u32, u32),
) -> SupplierProfile {
    SupplierProfile::new(name, display_name, tax_id, keywords)
        .with_header_region(HeaderRegion::new(x, y, width, height))
}

#[rustfmt::skip]
pub(super) fn suppliers() -> Vec<SupplierProfile> {
    vec![
        // Wine and spirits distributors
        supplier("teofilo", "Estabelecimentos Teófilo Fontainhas Neto", "500099871", &[r"teofilo", r"fontainhas", r"messines", r"8375-127", r"teofilo.pt"], (0, 0, 400, 150)),
        supplier("soares", "Garrafeira Soares", "501496912", &[r"soares", r"garrafeira", r"wine.*spirits", r"40.*anos", r"garrafeirasoares.pt"], (0, 0, 300, 150)),
        supplier("garcias", "Garcias S.A.", "501141243", &[r"garcias", r"wines.*spirits", r"algoz", r"8365-085", r"garcias.pt"], (0, 0, 300, 150)),
        supplier("jmv", "Jose Maria Vieira S.A.", "503858471", &[r"jose.*maria.*vieira", r"rio.*tinto", r"4439-909"], (0, 0, 400, 100)),
        supplier("justdrinks", "Justdrinks Lda", "508976464", &[r"justdrinks", r"quatro.*estradas", r"8100-287", r"justdrinks.pt"], (0, 0, 300, 200)),
        supplier("novadis", "Novadis Unipessoal Lda", "504350900", &[r"novadis", r"alfarrobeira", r"vila.*franca.*xira", r"centralcervejas"], (0, 0, 400, 100)),
        supplier("absolutlyvintage", "Absolutly Vintage Unipessoal Lda", "516001906", &[r"absolutly.*vintage", r"alcantarilha", r"8365-028", r"rogel"], (0, 0, 300, 200)),
        supplier("magniberia", "Magnibéria Ltd. (VENKO Solutions)", "515102334", &[r"magniberia", r"venko", r"tavira", r"8800-318", r"magniberia.pt"], (0, 0, 300, 150)),
        // Teófilo document types sharing the same NIF
        supplier("teofilo_gd", "Teófilo - Guia de Devolução", "500099871", &[r"guia.*devolu", r"produto.*reclamado", r"produto.*devolvido"], (0, 0, 400, 150)),
        supplier("teofilo_nc", "Teófilo - Nota de Crédito", "500099871", &[r"nota.*cr[ée]dito", r"c\s*caau"], (0, 0, 400, 150)),
        // Supermarkets, fuel, retail, restaurants and tolls
        supplier("intermarche", "Intermarché / Sodiquarteira", "508162378", &[r"intermarche", r"sodiquarteira", r"vilamoura", r"supermercados"], (0, 0, 400, 150)),
        supplier("continente", "Continente Hipermercados", "502011475", &[r"continente", r"hipermercados", r"sonae"], (0, 0, 400, 150)),
        supplier("moeve", "Moeve (Galp Tolls)", "500223840", &[r"moeve", r"operacoes.*retalho"], (0, 0, 400, 150)),
        supplier("galp", "Galp Energia", "500697370", &[r"galp", r"petróleos", r"energia"], (0, 0, 400, 150)),
        supplier("cepsa", "Cepsa / Vilacomb", "510748430", &[r"cepsa", r"vilacomb", r"combustiveis"], (0, 0, 400, 150)),
        supplier("makro_gas", "Makro Gas (Carbusol)", "505337053", &[r"carbusol", r"makro.*fetha"], (0, 0, 400, 150)),
        supplier("action", "Action Store", "517247739", &[r"action", r"storeops.*portugal"], (0, 0, 400, 150)),
        supplier("burgerking", "Burger King", "504661264", &[r"burger.*king", r"whopper"], (0, 0, 400, 150)),
        supplier("mourapao", "Mourapão / Sailor Corner", "518468020", &[r"mourapao", r"sailor.*corner", r"grupo.*mourapao"], (0, 0, 400, 150)),
        supplier("worten", "Worten", "503630330", &[r"worten", r"equipamentos.*lar"], (0, 0, 400, 150)),
        supplier("wells", "Wells Pharmacy", "508037514", &[r"wells", r"pharmacontinente"], (0, 0, 400, 150)),
        supplier("matchpoint", "Pizzaria MatchPoint", "516585800", &[r"matchpoint", r"premier.*sports"], (0, 0, 400, 150)),
        supplier("overseas", "Overseas Supermercados", "509943888", &[r"overseas", r"tavagueira"], (0, 0, 400, 150)),
        supplier("makro", "Makro Cash & Carry", "502030712", &[r"makro", r"cash.*carry"], (0, 0, 400, 150)),
        supplier("pingodoce", "Pingo Doce", "500829093", &[r"pingo.*doce", r"distribuição.*alimentar"], (0, 0, 400, 150)),
        supplier("lidl", "Lidl", "503340855", &[r"lidl", r"www\.lidl\.pt"], (0, 0, 400, 150)),
        supplier("inframoura", "Inframoura", "504915266", &[r"inframoura", r"águas.*algarve", r"saneamento"], (0, 0, 400, 150)),
        supplier("constamarina", "Constamarina", "504147480", &[r"constamarina", r"drogaria.*nauticos"], (0, 0, 400, 150)),
        supplier("constantino", "Drogaria Constantino", "500072205", &[r"constantino", r"rocha.*amador"], (0, 0, 400, 150)),
        supplier("papelnet", "Papelnet", "504064282", &[r"papelnet", r"papelaria"], (0, 0, 400, 150)),
        supplier("osakasushi", "Osaka Sushi", "518794482", &[r"osaka", r"meridiano.*suculento"], (0, 0, 400, 150)),
        supplier("tribulum", "Tribulum Restaurant", "515892327", &[r"tribulum", r"all.*over.*mountain"], (0, 0, 400, 150)),
        supplier("zorba", "Zorba The Greek", "518564410", &[r"zorba", r"meadows.*heaven"], (0, 0, 400, 150)),
        supplier("sinfonia", "Sinfonia d'Iguarias", "518636766", &[r"sinfonia", r"iguarias"], (0, 0, 400, 150)),
        supplier("eurolatina", "Eurolatina Bakery", "502781106", &[r"eurolatina", r"diniz.*nota.*loureiro"], (0, 0, 400, 150)),
        supplier("brisa", "Brisa Service Areas", "514166096", &[r"brisa", r"areas.*servico"], (0, 0, 400, 150)),
        supplier("ikea", "IKEA Portugal", "505416654", &[r"ikea", r"moveis.*decoracao"], (0, 0, 400, 150)),
        supplier("leroy", "Leroy Merlin", "506848556", &[r"leroy.*merlin", r"bricolage"], (0, 0, 400, 150)),
        supplier("staples", "Staples Portugal", "503789372", &[r"staples", r"equipamento.*escritorio"], (0, 0, 400, 150)),
        supplier("note", "Note Papelaria", "517309505", &[r"note", r"mundo.*note", r"livraria.*papelaria"], (0, 0, 400, 150)),
        supplier("partyland", "Partyland", "509199429", &[r"partyland", r"solucoes.*alegres"], (0, 0, 400, 150)),
        supplier("alparques", "Alparques Estacionamento", "514916494", &[r"alparques", r"parque.*estac"], (0, 0, 400, 150)),
        supplier("pizzahut", "Pizza Hut", "502604735", &[r"pizza.*hut", r"iberusa"], (0, 0, 400, 150)),
        supplier("mcdonalds", "McDonald's", "504416014", &[r"mcdonald", r"magic.*empreend"], (0, 0, 400, 150)),
        supplier("dominos", "Domino's Pizza", "513146051", &[r"domino", r"daufood"], (0, 0, 400, 150)),
        supplier("apaisagem", "Restaurante A Paisagem", "510577199", &[r"paisagem", r"wine.*glass", r"churrasqueira"], (0, 0, 400, 150)),
        supplier("a4tabacaria", "A4 Tabacarias", "502749423", &[r"a4.*tabacaria", r"tabacarias.*lda"], (0, 0, 400, 150)),
        supplier("anticapizzeria", "Antica Pizzeria", "517973634", &[r"antica.*pizzeria", r"centralholding"], (0, 0, 400, 150)),
        supplier("italianrepublic", "Italian Republic Restaurant", "503254435", &[r"italian.*republic", r"estrela.*guia"], (0, 0, 400, 150)),
        supplier("reichurrasco", "Rei do Churrasco", "515553565", &[r"rei.*churrasco", r"titulo.*amistoso"], (0, 0, 400, 150)),
        supplier("solarfarelo", "Solar do Farelo", "504055224", &[r"solar.*farelo", r"dois.*dias.*hotelaria"], (0, 0, 400, 150)),
        supplier("botanico", "Botanico Restaurant", "516823961", &[r"botanico", r"quinta.*lago"], (0, 0, 400, 150)),
        supplier("adegamonte", "Adega do Monte Velho", "", &[r"adega.*monte", r"natureza.*prato"], (0, 0, 400, 150)),
        supplier("afamilia", "A Família Pizzaria", "508179047", &[r"familia", r"pizzaria.*artesanal.*brasileira"], (0, 0, 400, 150)),
        supplier("artisan", "Artisan Restaurant", "515652946", &[r"artisan", r"luxury.*ingredient", r"old.*village"], (0, 0, 400, 150)),
        supplier("bagga", "Bagga", "508879990", &[r"bagga", r"pronto.*gostar", r"bb.*food"], (0, 0, 400, 150)),
        supplier("maxidrive", "Maxidrive Pizzaria", "515865672", &[r"maxidrive", r"galaxialaranjada"], (0, 0, 400, 150)),
        supplier("padoca", "Padoca", "000000000", &[r"padoca", r"costa.*leitas", r"las.*arcos"], (0, 0, 400, 150)),
        supplier("gildadasilva", "Gilda da Silva", "219329976", &[r"gilda.*silva", r"multiservicos.*solbelo"], (0, 0, 400, 150)),
        supplier("robalo", "Robalo S.A.", "500654573", &[r"robalo", r"utilidades.*dom.sticas", r"hoteleiras", r"robalo-sa\.com"], (0, 0, 400, 150)),
        supplier("seminoshopping", "Semino Shopping", "247388858", &[r"semino.*shopping", r"chen.*shuang"], (0, 0, 400, 150)),
        supplier("orientalshopping", "Oriental Shopping", "514703873", &[r"oriental.*shopping", r"orientalefeito"], (0, 0, 400, 150)),
        supplier("shoppingloule", "Shopping Loulé", "509713955", &[r"shopping.*loule", r"leia.*creia"], (0, 0, 400, 150)),
        supplier("bp", "BP Gas Station", "507161058", &[r"\bbp\b", r"bp.*quarteira", r"bp.*vilamoura"], (0, 0, 400, 150)),
        supplier("kiabi", "Kiabi", "000000000", &[r"kiabi", r"fidelidade"], (0, 0, 400, 150)),
        supplier("brisatoll", "Brisa Tolls (BCR)", "502790624", &[r"brisa.*concessao", r"bcr", r"portagem"], (0, 0, 400, 150)),
    ]
}

/// Tax IDs used by more than one logical document type.
pub(super) fn shared_tax_ids() -> Vec<SharedTaxId> {
    vec![SharedTaxId {
        tax_id: "500099871".to_string(),
        variants: vec![
            TaxIdVariant::new(
                "teofilo_gd",
                &["guia.*devolu", "produto.*reclamado", "produto.*devolvido"],
            ),
            TaxIdVariant::new("teofilo_nc", &["nota.*cr[ée]dito", r"c\s*caau"]),
            TaxIdVariant::new("teofilo", &[]),
        ],
    }]
}
