use std::sync::Arc;

use totem_kiosk::models::{
    Announcement, AnnouncementDraft, AnnouncementKind, OfferCategory, OfferCategoryDraft,
    PaymentConfigUpdate, Product, ProductCategory, ProductDraft, Schedule, ScheduleDraft,
    ServiceError, MAX_PRICE_CENTS,
};
use totem_kiosk::repositories::ContentStore;
use totem_kiosk::services::{AdminPanel, AdminTab, ConfirmationOutcome, SaveOutcome};

fn setup() -> (Arc<ContentStore>, AdminPanel) {
    let store = Arc::new(ContentStore::with_builtin_content());
    let panel = AdminPanel::new(Arc::clone(&store));
    (store, panel)
}

fn schedule_draft(title: &str) -> ScheduleDraft {
    ScheduleDraft {
        day: "Sábado".to_string(),
        time: "08:00".to_string(),
        title: title.to_string(),
    }
}

#[test]
fn test_save_adds_and_resets_draft() {
    let (store, mut panel) = setup();

    panel.set_draft::<Schedule>(schedule_draft("Oração")).unwrap();
    let outcome = panel.save::<Schedule>().unwrap();

    let SaveOutcome::Added { id } = outcome else {
        panic!("expected an add");
    };
    assert_eq!(store.get::<Schedule>(&id).unwrap().title, "Oração");
    assert_eq!(panel.forms().schedules.draft, ScheduleDraft::default());
    assert_eq!(panel.forms().schedules.editing_id, None);
}

#[test]
fn test_save_with_missing_fields_keeps_draft() {
    let (store, mut panel) = setup();
    let draft = ScheduleDraft {
        title: "   ".to_string(),
        ..schedule_draft("")
    };

    panel.set_draft::<Schedule>(draft.clone()).unwrap();
    let err = panel.save::<Schedule>().unwrap_err();

    match err {
        ServiceError::ValidationError(msg) => assert_eq!(msg, "Preencha todos os campos."),
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(panel.forms().schedules.draft, draft);
    assert_eq!(store.list::<Schedule>().len(), 4);
    assert_eq!(store.revision(), 0);
}

#[test]
fn test_offer_category_requires_title() {
    let (_store, mut panel) = setup();
    panel.switch_tab(AdminTab::Offers).unwrap();

    let err = panel.save::<OfferCategory>().unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(msg) if msg == "Preencha o título."));
}

#[test]
fn test_product_price_must_be_positive() {
    let (store, mut panel) = setup();
    panel.switch_tab(AdminTab::Products).unwrap();

    for price in [None, Some(0), Some(-100)] {
        panel
            .set_draft::<Product>(ProductDraft {
                name: "Caneca".to_string(),
                price,
                category: ProductCategory::Other,
            })
            .unwrap();
        assert!(matches!(
            panel.save::<Product>(),
            Err(ServiceError::ValidationError(_))
        ));
    }
    assert_eq!(store.list::<Product>().len(), 6);
}

#[test]
fn test_product_price_above_keypad_limit_is_rejected() {
    let (store, mut panel) = setup();
    panel.switch_tab(AdminTab::Products).unwrap();

    for price in [MAX_PRICE_CENTS + 1, i64::MAX / 2 + 1] {
        panel
            .set_draft::<Product>(ProductDraft {
                name: "Órgão".to_string(),
                price: Some(price),
                category: ProductCategory::Other,
            })
            .unwrap();
        assert!(matches!(
            panel.save::<Product>(),
            Err(ServiceError::ValidationError(_))
        ));
    }
    assert_eq!(store.list::<Product>().len(), 6);

    panel
        .set_draft::<Product>(ProductDraft {
            name: "Órgão".to_string(),
            price: Some(MAX_PRICE_CENTS),
            category: ProductCategory::Other,
        })
        .unwrap();
    assert!(panel.save::<Product>().is_ok());
}

#[test]
fn test_edit_then_save_updates_record() {
    let (store, mut panel) = setup();
    panel.switch_tab(AdminTab::Products).unwrap();

    let draft = panel.edit::<Product>("5").unwrap();
    assert_eq!(draft.name, "Camiseta");
    assert_eq!(draft.price, Some(3500));
    assert_eq!(panel.forms().products.editing_id.as_deref(), Some("5"));

    panel
        .set_draft::<Product>(ProductDraft {
            price: Some(4000),
            ..draft
        })
        .unwrap();
    let outcome = panel.save::<Product>().unwrap();

    assert_eq!(outcome, SaveOutcome::Updated { id: "5".to_string() });
    assert_eq!(store.get::<Product>("5").unwrap().price, 4000);
    assert_eq!(store.list::<Product>().len(), 6);
    assert_eq!(panel.forms().products.editing_id, None);
    assert_eq!(panel.forms().products.draft.category, ProductCategory::Other);
}

#[test]
fn test_edit_unknown_id_is_not_found() {
    let (_store, mut panel) = setup();
    assert!(matches!(
        panel.edit::<Schedule>("missing"),
        Err(ServiceError::NotFound(_))
    ));
}

#[test]
fn test_cancel_edit_resets_form() {
    let (_store, mut panel) = setup();
    panel.switch_tab(AdminTab::Announcements).unwrap();
    panel.edit::<Announcement>("1").unwrap();

    panel.cancel_edit::<Announcement>().unwrap();
    assert_eq!(panel.forms().announcements.editing_id, None);
    assert_eq!(panel.forms().announcements.draft.kind, AnnouncementKind::Info);
    assert!(panel.forms().announcements.draft.title.is_empty());
}

#[test]
fn test_operations_require_active_tab() {
    let (_store, mut panel) = setup();
    assert_eq!(panel.active_tab(), AdminTab::Schedules);

    assert!(matches!(
        panel.save::<Product>(),
        Err(ServiceError::InvalidTransition(_))
    ));
    assert!(matches!(
        panel.save_config(),
        Err(ServiceError::InvalidTransition(_))
    ));
}

#[test]
fn test_switching_tabs_drops_edit_of_tab_left() {
    let (_store, mut panel) = setup();
    panel.edit::<Schedule>("2").unwrap();

    panel.switch_tab(AdminTab::Announcements).unwrap();
    panel.switch_tab(AdminTab::Schedules).unwrap();

    assert_eq!(panel.forms().schedules.editing_id, None);
    assert_eq!(panel.forms().schedules.draft, ScheduleDraft::default());
}

#[test]
fn test_leaving_config_tab_reseeds_form_from_store() {
    let (store, mut panel) = setup();
    panel.switch_tab(AdminTab::Config).unwrap();
    panel
        .set_config_draft(PaymentConfigUpdate {
            pix_key: Some("rascunho".to_string()),
            card_machine_enabled: Some(false),
            ..Default::default()
        })
        .unwrap();

    panel.switch_tab(AdminTab::Schedules).unwrap();

    assert_eq!(panel.config_form(), &store.payment_config());
    assert_eq!(panel.config_form().pix_key, "12.345.678/0001-90");
    assert!(panel.config_form().card_machine_enabled);
}

#[test]
fn test_delete_requires_confirmation() {
    let (store, mut panel) = setup();

    let pending = panel.request_delete::<Schedule>("3").unwrap().clone();
    assert_eq!(pending.id, "3");
    assert!(store.get::<Schedule>("3").is_some());

    // Modal: everything else waits for the answer.
    assert!(matches!(
        panel.switch_tab(AdminTab::Products),
        Err(ServiceError::InvalidTransition(_))
    ));
    assert!(matches!(
        panel.save::<Schedule>(),
        Err(ServiceError::InvalidTransition(_))
    ));

    let outcome = panel.resolve_confirmation(true).unwrap();
    assert!(matches!(outcome, ConfirmationOutcome::Deleted { ref id, .. } if id == "3"));
    assert!(store.get::<Schedule>("3").is_none());
    assert!(panel.pending_delete().is_none());
}

#[test]
fn test_declined_confirmation_keeps_record() {
    let (store, mut panel) = setup();
    panel.request_delete::<Schedule>("1").unwrap();

    assert_eq!(
        panel.resolve_confirmation(false).unwrap(),
        ConfirmationOutcome::Dismissed
    );
    assert!(store.get::<Schedule>("1").is_some());
    assert!(matches!(
        panel.resolve_confirmation(true),
        Err(ServiceError::InvalidTransition(_))
    ));
}

#[test]
fn test_deleting_record_under_edit_clears_edit_and_next_save_adds() {
    let (store, mut panel) = setup();
    panel.switch_tab(AdminTab::Offers).unwrap();
    panel.edit::<OfferCategory>("1").unwrap();

    panel.request_delete::<OfferCategory>("1").unwrap();
    panel.resolve_confirmation(true).unwrap();
    assert_eq!(panel.forms().offers.editing_id, None);

    panel
        .set_draft::<OfferCategory>(OfferCategoryDraft {
            title: "Oferta de Gratidão".to_string(),
        })
        .unwrap();
    let outcome = panel.save::<OfferCategory>().unwrap();

    assert!(matches!(outcome, SaveOutcome::Added { .. }));
    assert_eq!(store.list::<OfferCategory>().len(), 2);
}

#[test]
fn test_deleting_other_record_keeps_edit() {
    let (_store, mut panel) = setup();
    panel.edit::<Schedule>("1").unwrap();

    panel.request_delete::<Schedule>("2").unwrap();
    panel.resolve_confirmation(true).unwrap();

    assert_eq!(panel.forms().schedules.editing_id.as_deref(), Some("1"));
}

#[test]
fn test_request_delete_unknown_id() {
    let (_store, mut panel) = setup();
    assert!(matches!(
        panel.request_delete::<Schedule>("missing"),
        Err(ServiceError::NotFound(_))
    ));
    assert!(panel.pending_delete().is_none());
}

#[test]
fn test_announcement_save_keeps_type() {
    let (store, mut panel) = setup();
    panel.switch_tab(AdminTab::Announcements).unwrap();
    panel
        .set_draft::<Announcement>(AnnouncementDraft {
            title: "Santa Ceia".to_string(),
            date: "05/04/2026".to_string(),
            description: "Primeiro domingo do mês.".to_string(),
            kind: AnnouncementKind::Alert,
        })
        .unwrap();

    let SaveOutcome::Added { id } = panel.save::<Announcement>().unwrap() else {
        panic!("expected an add");
    };
    assert_eq!(store.get::<Announcement>(&id).unwrap().kind, AnnouncementKind::Alert);
}

// =============================================================================
// PAYMENT CONFIGURATION
// =============================================================================

#[test]
fn test_config_form_is_seeded_from_store() {
    let (_store, panel) = setup();
    assert_eq!(panel.config_form().pix_key, "12.345.678/0001-90");
}

#[test]
fn test_save_config_updates_store() {
    let (store, mut panel) = setup();
    panel.switch_tab(AdminTab::Config).unwrap();

    panel
        .set_config_draft(PaymentConfigUpdate {
            pix_key: Some("igreja@example.com".to_string()),
            card_machine_enabled: Some(false),
            ..Default::default()
        })
        .unwrap();
    let saved = panel.save_config().unwrap();

    assert_eq!(saved.pix_key, "igreja@example.com");
    assert_eq!(store.payment_config(), saved);
}

#[test]
fn test_config_validation() {
    let (store, mut panel) = setup();
    panel.switch_tab(AdminTab::Config).unwrap();

    panel
        .set_config_draft(PaymentConfigUpdate {
            card_machine_ip: Some(String::new()),
            ..Default::default()
        })
        .unwrap();
    assert!(matches!(
        panel.save_config(),
        Err(ServiceError::ValidationError(_))
    ));

    panel
        .set_config_draft(PaymentConfigUpdate {
            card_machine_enabled: Some(false),
            ..Default::default()
        })
        .unwrap();
    assert!(panel.save_config().is_ok());
    assert_eq!(store.payment_config().card_machine_ip, "");
}

#[test]
fn test_config_form_reseeds_on_external_change() {
    let (store, mut panel) = setup();
    panel.switch_tab(AdminTab::Config).unwrap();
    panel
        .set_config_draft(PaymentConfigUpdate {
            pix_key: Some("rascunho".to_string()),
            ..Default::default()
        })
        .unwrap();

    store.update_payment_config(PaymentConfigUpdate {
        pix_key: Some("00000000000".to_string()),
        ..Default::default()
    });

    let view = panel.view();
    assert_eq!(view.config.pix_key, "00000000000");
}

#[test]
fn test_record_events_do_not_reseed_config() {
    let (store, mut panel) = setup();
    panel.switch_tab(AdminTab::Config).unwrap();
    panel
        .set_config_draft(PaymentConfigUpdate {
            pix_key: Some("rascunho".to_string()),
            ..Default::default()
        })
        .unwrap();

    store.remove::<Schedule>("1");

    assert_eq!(panel.view().config.pix_key, "rascunho");
}

#[test]
fn test_reset_returns_to_fresh_panel() {
    let (_store, mut panel) = setup();
    panel.edit::<Schedule>("1").unwrap();
    panel.request_delete::<Schedule>("2").unwrap();

    panel.reset();

    assert_eq!(panel.active_tab(), AdminTab::Schedules);
    assert!(panel.pending_delete().is_none());
    assert_eq!(panel.forms().schedules.editing_id, None);
}
