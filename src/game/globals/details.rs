use crate::game::data::{BoardData, RawAction, RawCard, RawRent, RawSquare};

/// Create a colored property record.
fn build_property(id: u32, name: &str, color: &str, price: i64, rents: [i64; 6]) -> RawSquare {
    RawSquare {
        id,
        name: name.to_owned(),
        kind: "property".to_owned(),
        color: Some(color.to_owned()),
        price: Some(price),
        mortgage: Some(price / 2),
        rent: Some(RawRent::Buildings {
            base: rents[0],
            with_house: rents[1..5].to_vec(),
            with_hotel: rents[5],
        }),
        action: None,
    }
}

fn build_railroad(id: u32, name: &str) -> RawSquare {
    RawSquare {
        id,
        name: name.to_owned(),
        kind: "railroad".to_owned(),
        color: None,
        price: Some(200),
        mortgage: Some(100),
        rent: Some(RawRent::Schedule(vec![25, 50, 100, 200])),
        action: None,
    }
}

fn build_utility(id: u32, name: &str) -> RawSquare {
    RawSquare {
        id,
        name: name.to_owned(),
        kind: "utility".to_owned(),
        color: None,
        price: Some(150),
        mortgage: Some(75),
        rent: Some(RawRent::Schedule(vec![4, 10])),
        action: None,
    }
}

fn build_tax(id: u32, name: &str, amount: i64) -> RawSquare {
    RawSquare {
        action: Some(RawAction {
            money: Some(-amount),
            ..RawAction::default()
        }),
        ..build_plain(id, name, "tax")
    }
}

/// Create a square record that carries nothing but its type.
fn build_plain(id: u32, name: &str, kind: &str) -> RawSquare {
    RawSquare {
        id,
        name: name.to_owned(),
        kind: kind.to_owned(),
        color: None,
        price: None,
        mortgage: None,
        rent: None,
        action: None,
    }
}

fn build_card(id: u32, kind: &str, description: &str, action: RawAction) -> RawCard {
    RawCard {
        id,
        description: description.to_owned(),
        kind: kind.to_owned(),
        action,
    }
}

fn money(amount: i64) -> RawAction {
    RawAction {
        money: Some(amount),
        ..RawAction::default()
    }
}

/// The classic 40 square board, split into its four sides.
pub fn classic_board_data() -> BoardData {
    BoardData {
        bottom: vec![
            build_plain(0, "Go", "special"),
            build_property(1, "Mediterranean Avenue", "brown", 60, [2, 10, 30, 90, 160, 250]),
            build_plain(2, "Community Chest", "community_chest"),
            build_property(3, "Baltic Avenue", "brown", 60, [4, 20, 60, 180, 320, 450]),
            build_tax(4, "Income Tax", 200),
            build_railroad(5, "Reading Railroad"),
            build_property(6, "Oriental Avenue", "lightblue", 100, [6, 30, 90, 270, 400, 550]),
            build_plain(7, "Chance", "chance"),
            build_property(8, "Vermont Avenue", "lightblue", 100, [6, 30, 90, 270, 400, 550]),
            build_property(9, "Connecticut Avenue", "lightblue", 120, [8, 40, 100, 300, 450, 600]),
        ],
        left: vec![
            build_plain(10, "Jail", "jail"),
            build_property(11, "St. Charles Place", "purple", 140, [10, 50, 150, 450, 625, 750]),
            build_utility(12, "Electric Company"),
            build_property(13, "States Avenue", "purple", 140, [10, 50, 150, 450, 625, 750]),
            build_property(14, "Virginia Avenue", "purple", 160, [12, 60, 180, 500, 700, 900]),
            build_railroad(15, "Pennsylvania Railroad"),
            build_property(16, "St. James Place", "orange", 180, [14, 70, 200, 550, 750, 950]),
            build_plain(17, "Community Chest", "community_chest"),
            build_property(18, "Tennessee Avenue", "orange", 180, [14, 70, 200, 550, 750, 950]),
            build_property(19, "New York Avenue", "orange", 200, [16, 80, 220, 600, 800, 1000]),
        ],
        top: vec![
            build_plain(20, "Free Parking", "free_parking"),
            build_property(21, "Kentucky Avenue", "red", 220, [18, 90, 250, 700, 875, 1050]),
            build_plain(22, "Chance", "chance"),
            build_property(23, "Indiana Avenue", "red", 220, [18, 90, 250, 700, 875, 1050]),
            build_property(24, "Illinois Avenue", "red", 240, [20, 100, 300, 750, 925, 1100]),
            build_railroad(25, "B. & O. Railroad"),
            build_property(26, "Atlantic Avenue", "yellow", 260, [22, 110, 330, 800, 975, 1150]),
            build_property(27, "Ventnor Avenue", "yellow", 260, [22, 110, 330, 800, 975, 1150]),
            build_utility(28, "Water Works"),
            build_property(29, "Marvin Gardens", "yellow", 280, [24, 120, 360, 850, 1025, 1200]),
        ],
        right: vec![
            RawSquare {
                action: Some(RawAction {
                    go_to: Some("jail".to_owned()),
                    ..RawAction::default()
                }),
                ..build_plain(30, "Go To Jail", "go_to_jail")
            },
            build_property(31, "Pacific Avenue", "green", 300, [26, 130, 390, 900, 1100, 1275]),
            build_property(32, "North Carolina Avenue", "green", 300, [26, 130, 390, 900, 1100, 1275]),
            build_plain(33, "Community Chest", "community_chest"),
            build_property(34, "Pennsylvania Avenue", "green", 320, [28, 150, 450, 1000, 1200, 1400]),
            build_railroad(35, "Short Line"),
            build_plain(36, "Chance", "chance"),
            build_property(37, "Park Place", "blue", 350, [35, 175, 500, 1100, 1300, 1500]),
            build_tax(38, "Luxury Tax", 100),
            build_property(39, "Boardwalk", "blue", 400, [50, 200, 600, 1400, 1700, 2000]),
        ],
    }
}

/// A small chance deck for when the backend is unreachable.
pub fn fallback_chance() -> Vec<RawCard> {
    vec![
        build_card(
            1,
            "chance",
            "Advance to Go and collect your salary",
            RawAction {
                move_to: Some(0),
                ..RawAction::default()
            },
        ),
        build_card(
            2,
            "chance",
            "Go directly to jail",
            RawAction {
                go_to: Some("jail".to_owned()),
                ..RawAction::default()
            },
        ),
        build_card(
            3,
            "chance",
            "Go back three spaces",
            RawAction {
                steps: Some(-3),
                ..RawAction::default()
            },
        ),
        build_card(4, "chance", "Bank pays you a dividend of $50", money(50)),
        build_card(5, "chance", "Speeding fine, pay $15", money(-15)),
    ]
}

/// A small community chest deck for when the backend is unreachable.
pub fn fallback_community_chest() -> Vec<RawCard> {
    vec![
        build_card(1, "community_chest", "Bank error in your favor, collect $200", money(200)),
        build_card(2, "community_chest", "Doctor's fee, pay $50", money(-50)),
        build_card(3, "community_chest", "Income tax refund, collect $20", money(20)),
        build_card(
            4,
            "community_chest",
            "Go directly to jail",
            RawAction {
                go_to: Some("jail".to_owned()),
                ..RawAction::default()
            },
        ),
    ]
}
