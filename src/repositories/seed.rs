use crate::models::{
    Announcement, AnnouncementKind, OfferCategory, PaymentConfig, Product, ProductCategory,
    Schedule,
};
use crate::repositories::ContentState;

fn schedule(id: &str, day: &str, time: &str, title: &str) -> Schedule {
    Schedule {
        id: id.to_string(),
        day: day.to_string(),
        time: time.to_string(),
        title: title.to_string(),
    }
}

fn announcement(
    id: &str,
    title: &str,
    date: &str,
    description: &str,
    kind: AnnouncementKind,
) -> Announcement {
    Announcement {
        id: id.to_string(),
        title: title.to_string(),
        date: date.to_string(),
        description: description.to_string(),
        kind,
    }
}

fn product(id: &str, name: &str, price: i64, category: ProductCategory) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        price,
        category,
    }
}

/// Content the kiosk starts with after every restart.
pub fn builtin_content() -> ContentState {
    ContentState {
        schedules: vec![
            schedule("1", "Terça-feira", "19:30", "Culto de Doutrina"),
            schedule("2", "Quinta-feira", "19:30", "Culto de Libertação"),
            schedule("3", "Domingo", "09:00", "Escola Bíblica Dominical"),
            schedule("4", "Domingo", "18:00", "Culto da Família"),
        ],
        announcements: vec![
            announcement(
                "1",
                "Retiro de Jovens",
                "15/03/2026",
                "As inscrições para o retiro de jovens já estão abertas.",
                AnnouncementKind::Event,
            ),
            announcement(
                "2",
                "Bazar Beneficente",
                "22/03/2026",
                "Venha participar do nosso bazar em prol das obras sociais.",
                AnnouncementKind::Info,
            ),
            announcement(
                "3",
                "Reunião de Obreiros",
                "Todo primeiro sábado",
                "Reunião mensal às 09:00.",
                AnnouncementKind::Alert,
            ),
        ],
        products: vec![
            product("1", "Refrigerante", 500, ProductCategory::Drink),
            product("2", "Salgado", 700, ProductCategory::Food),
            product("3", "Água", 300, ProductCategory::Drink),
            product("4", "Bolo", 800, ProductCategory::Food),
            product("5", "Camiseta", 3500, ProductCategory::Clothing),
            product("6", "Livro", 2500, ProductCategory::Book),
        ],
        offer_categories: vec![
            OfferCategory {
                id: "1".to_string(),
                title: "Oferta Missionária".to_string(),
            },
            OfferCategory {
                id: "2".to_string(),
                title: "Oferta Comum".to_string(),
            },
        ],
        payment_config: PaymentConfig::default(),
    }
}
