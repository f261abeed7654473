//! Passive trail events: flavor text with small resource and health effects.
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Condition, EventCategory, WeightedEntry};
use crate::health::narrate_shift;
use crate::state::PartyState;

const WHEEL_REPAIR_COST: i32 = 10;
const WHEEL_JURY_RIG_HEALTH: f64 = -10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassiveEventId {
    ClearSkies,
    Overcast,
    LightRain,
    Storm,
    HotDay,
    CoolMorning,
    FoundBerries,
    FoundSupplies,
    FoundNothing,
    GoodCampsite,
    MuddyTrail,
    RockyTrail,
    SmoothTrail,
    DustStorm,
    WheelBroke,
    AxleCreak,
    OxLimping,
    OxenGraze,
    FriendlyTravelers,
    WagonTrain,
    GraveMarker,
    WildlifeSighting,
    SnakeScare,
    ScenicVista,
    CreekFord,
}

impl PassiveEventId {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::ClearSkies => "clear_skies",
            Self::Overcast => "overcast",
            Self::LightRain => "light_rain",
            Self::Storm => "storm",
            Self::HotDay => "hot_day",
            Self::CoolMorning => "cool_morning",
            Self::FoundBerries => "found_berries",
            Self::FoundSupplies => "found_supplies",
            Self::FoundNothing => "found_nothing",
            Self::GoodCampsite => "good_campsite",
            Self::MuddyTrail => "muddy_trail",
            Self::RockyTrail => "rocky_trail",
            Self::SmoothTrail => "smooth_trail",
            Self::DustStorm => "dust_storm",
            Self::WheelBroke => "wheel_broke",
            Self::AxleCreak => "axle_creak",
            Self::OxLimping => "ox_limping",
            Self::OxenGraze => "oxen_graze",
            Self::FriendlyTravelers => "friendly_travelers",
            Self::WagonTrain => "wagon_train",
            Self::GraveMarker => "grave_marker",
            Self::WildlifeSighting => "wildlife_sighting",
            Self::SnakeScare => "snake_scare",
            Self::ScenicVista => "scenic_vista",
            Self::CreekFord => "creek_ford",
        }
    }
}

impl fmt::Display for PassiveEventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Passive event table row.
#[derive(Debug, Clone, Copy)]
pub struct PassiveEvent {
    pub id: PassiveEventId,
    pub category: EventCategory,
    pub weight: u32,
    pub condition: Option<Condition>,
}

impl PassiveEvent {
    const fn new(id: PassiveEventId, category: EventCategory, weight: u32) -> Self {
        Self {
            id,
            category,
            weight,
            condition: None,
        }
    }

    const fn when(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }
}

impl WeightedEntry for PassiveEvent {
    fn key(&self) -> &'static str {
        self.id.key()
    }

    fn weight(&self) -> u32 {
        self.weight
    }

    fn condition(&self) -> Option<Condition> {
        self.condition
    }
}

fn past_prairie(state: &PartyState) -> bool {
    state.distance > 200
}

fn in_dry_country(state: &PartyState) -> bool {
    state.distance > 300
}

fn away_from_river(state: &PartyState) -> bool {
    !state.at_river
}

pub const PASSIVE_EVENTS: [PassiveEvent; 25] = {
    use EventCategory as C;
    use PassiveEventId as P;
    [
        PassiveEvent::new(P::ClearSkies, C::Weather, 5),
        PassiveEvent::new(P::Overcast, C::Weather, 3),
        PassiveEvent::new(P::LightRain, C::Weather, 2),
        PassiveEvent::new(P::Storm, C::Weather, 1),
        PassiveEvent::new(P::HotDay, C::Weather, 2).when(past_prairie),
        PassiveEvent::new(P::CoolMorning, C::Weather, 2),
        PassiveEvent::new(P::FoundBerries, C::Foraging, 2),
        PassiveEvent::new(P::FoundSupplies, C::Foraging, 1),
        PassiveEvent::new(P::FoundNothing, C::Foraging, 1),
        PassiveEvent::new(P::GoodCampsite, C::Foraging, 2),
        PassiveEvent::new(P::MuddyTrail, C::Trail, 2),
        PassiveEvent::new(P::RockyTrail, C::Trail, 1),
        PassiveEvent::new(P::SmoothTrail, C::Trail, 3),
        PassiveEvent::new(P::DustStorm, C::Trail, 1).when(in_dry_country),
        PassiveEvent::new(P::WheelBroke, C::Wagon, 1),
        PassiveEvent::new(P::AxleCreak, C::Wagon, 2),
        PassiveEvent::new(P::OxLimping, C::Oxen, 1),
        PassiveEvent::new(P::OxenGraze, C::Oxen, 2),
        PassiveEvent::new(P::FriendlyTravelers, C::People, 2),
        PassiveEvent::new(P::WagonTrain, C::People, 1),
        PassiveEvent::new(P::GraveMarker, C::People, 2),
        PassiveEvent::new(P::WildlifeSighting, C::Wildlife, 3),
        PassiveEvent::new(P::SnakeScare, C::Wildlife, 1),
        PassiveEvent::new(P::ScenicVista, C::Scenic, 2),
        PassiveEvent::new(P::CreekFord, C::Scenic, 1).when(away_from_river),
    ]
};

fn pick_line<R: Rng + ?Sized>(lines: &[&'static str], rng: &mut R) -> String {
    lines.choose(rng).copied().unwrap_or_default().to_string()
}

/// Apply `id` to the party and return its narration, including any rank shift.
///
/// Text for branching events is chosen from the branch actually taken, so a
/// storm weathered in warm clothing never reads like a miserable one.
pub fn apply_passive_event<R: Rng + ?Sized>(
    id: PassiveEventId,
    state: &mut PartyState,
    rng: &mut R,
) -> String {
    let mut health_delta = 0.0;
    let mut text = match id {
        PassiveEventId::ClearSkies => pick_line(
            &[
                "Clear skies and a steady breeze. Good traveling weather.",
                "Warm sun on the canvas. A fine day on the trail.",
                "Not a cloud anywhere. The oxen plod along contentedly.",
                "Wildflowers crowd the wheel ruts this morning.",
                "Perfect weather for making miles.",
            ],
            rng,
        ),
        PassiveEventId::Overcast => pick_line(
            &[
                "Gray skies, but the trail stays dry.",
                "Low clouds hang over the plains without a drop of rain.",
                "A cool, cloudy day. Easy on the eyes.",
            ],
            rng,
        ),
        PassiveEventId::LightRain => {
            health_delta = -2.0;
            pick_line(
                &[
                    "A light rain turns the ruts slick.",
                    "Drizzle all morning. Everyone is damp but cheerful enough.",
                    "Soft rain falls through the afternoon.",
                ],
                rng,
            )
        }
        PassiveEventId::Storm => {
            if state.clothing > 0 {
                pick_line(
                    &[
                        "A storm hit, but your extra clothing kept everyone warm!",
                        "Thunder and sheets of rain. Warm clothing keeps the worst of it off.",
                        "A heavy storm rolls through. The spare clothing makes all the difference.",
                    ],
                    rng,
                )
            } else {
                health_delta = -8.0;
                pick_line(
                    &[
                        "A storm slowed your progress and chilled your party.",
                        "Wind and driving rain all night. Everyone is miserable.",
                        "A fierce storm soaks the wagon. The cold bites deep.",
                    ],
                    rng,
                )
            }
        }
        PassiveEventId::HotDay => {
            state.consume_food(2);
            health_delta = -3.0;
            pick_line(
                &[
                    "Blazing heat. The oxen slow to a crawl.",
                    "Heat shimmers off the trail and the water barrels empty fast.",
                    "A scorching day. Everyone hunts for shade at noon.",
                ],
                rng,
            )
        }
        PassiveEventId::CoolMorning => {
            health_delta = 2.0;
            pick_line(
                &[
                    "A crisp, cool morning. Everyone steps lively.",
                    "Frost at dawn burns off quickly in the sun.",
                    "The cool air puts a spring in the party's step.",
                ],
                rng,
            )
        }
        PassiveEventId::FoundBerries => {
            let amount = rng.gen_range(3..=8);
            state.food += amount;
            let line = pick_line(
                &[
                    "You found some berries along the trail!",
                    "Wild berries! The children gather them by the hatful.",
                    "Ripe berries grow thick beside the path.",
                ],
                rng,
            );
            format!("{line} +{amount} lbs food.")
        }
        PassiveEventId::FoundSupplies => {
            state.food += 15;
            state.money += 5;
            let line = pick_line(
                &[
                    "Found abandoned supplies by the trail!",
                    "A deserted campsite still holds a few useful things.",
                    "Someone lightened their load here. Their loss, your gain.",
                ],
                rng,
            );
            format!("{line} +15 lbs food, +$5.")
        }
        PassiveEventId::FoundNothing => pick_line(
            &[
                "Something glints off the trail. Just a rusted tin can.",
                "You thought you spotted supplies, but it was only old rags.",
                "A detour to check a shape in the grass turns up nothing.",
            ],
            rng,
        ),
        PassiveEventId::GoodCampsite => {
            health_delta = 5.0;
            pick_line(
                &[
                    "You found a good camping spot near a stream.",
                    "A sheltered camp with fresh water close by.",
                    "Tonight's camp sits beside a creek. The sound of water soothes everyone.",
                ],
                rng,
            )
        }
        PassiveEventId::MuddyTrail => {
            health_delta = -3.0;
            pick_line(
                &[
                    "The trail is muddy and difficult. Progress is slow.",
                    "Wheels sink to the hubs in mud. Hard going today.",
                    "Every mile through the muck is a struggle.",
                ],
                rng,
            )
        }
        PassiveEventId::RockyTrail => {
            health_delta = -4.0;
            pick_line(
                &[
                    "Rocky ground shakes the wagon hard.",
                    "The wagon groans across a stretch of loose stone.",
                    "Ruts and rocks make for a bone-jarring ride.",
                ],
                rng,
            )
        }
        PassiveEventId::SmoothTrail => pick_line(
            &[
                "The trail is smooth and well-worn. Good progress today.",
                "Firm, flat ground. The wagon rolls easily.",
                "A well-traveled stretch. The oxen make excellent time.",
            ],
            rng,
        ),
        PassiveEventId::DustStorm => {
            health_delta = -6.0;
            pick_line(
                &[
                    "A dust storm blows in and swallows the trail.",
                    "Choking dust fills the air. You stop until it passes.",
                    "Wind whips up thick dust. Everyone covers their faces.",
                ],
                rng,
            )
        }
        PassiveEventId::WheelBroke => {
            if state.spare_parts > 0 {
                state.spare_parts -= 1;
                pick_line(
                    &[
                        "Wagon wheel broke! You used a spare part to fix it.",
                        "A wheel splintered on a rock. Good thing you packed spare parts.",
                        "Cracked wheel! The spare parts earn their keep.",
                    ],
                    rng,
                )
            } else if state.money >= WHEEL_REPAIR_COST {
                state.spend(WHEEL_REPAIR_COST);
                pick_line(
                    &[
                        "Wagon wheel broke! Repairs cost $10.",
                        "A wheel shattered. Without spare parts, the repair costs $10.",
                        "Broken wheel. You pay $10 to a passing wheelwright.",
                    ],
                    rng,
                )
            } else {
                health_delta = WHEEL_JURY_RIG_HEALTH;
                "Wagon wheel broke! With no parts or money, you jury-rig a fix and it takes a toll."
                    .to_string()
            }
        }
        PassiveEventId::AxleCreak => pick_line(
            &[
                "The axle creaks ominously but holds together.",
                "A worrying groan from the wagon bed. It seems fine for now.",
                "The wagon lurches through a rut. Nothing broken.",
            ],
            rng,
        ),
        PassiveEventId::OxLimping => {
            health_delta = -5.0;
            pick_line(
                &[
                    "One of your oxen is limping but pushes on.",
                    "An ox favors a foreleg and the pace slackens.",
                    "One ox looks hurt but refuses to stop.",
                ],
                rng,
            )
        }
        PassiveEventId::OxenGraze => {
            health_delta = 3.0;
            pick_line(
                &[
                    "The oxen found good grazing. They look refreshed.",
                    "Rich grassland here. The oxen eat well tonight.",
                    "Lush grass beside the trail keeps the herd content.",
                ],
                rng,
            )
        }
        PassiveEventId::FriendlyTravelers => {
            let amount = rng.gen_range(5..=15);
            state.food += amount;
            let line = pick_line(
                &[
                    "You met friendly travelers who shared supplies!",
                    "A family heading back east hands over some provisions.",
                    "Fellow emigrants share a meal with you.",
                ],
                rng,
            );
            format!("{line} +{amount} lbs food.")
        }
        PassiveEventId::WagonTrain => {
            health_delta = 3.0;
            pick_line(
                &[
                    "You joined a larger wagon train for the day. Safety in numbers.",
                    "A group of wagons catches up and you travel together a while.",
                    "Other travelers trade stories around the fire tonight.",
                ],
                rng,
            )
        }
        PassiveEventId::GraveMarker => pick_line(
            &[
                "You pass a grave marker by the trail. A somber reminder.",
                "A wooden cross marks a grave. Someone didn't make it.",
                "Several graves line the trail here.",
                "A weathered marker bears a name you can barely read.",
            ],
            rng,
        ),
        PassiveEventId::WildlifeSighting => pick_line(
            &[
                "A herd of antelope crosses the trail ahead.",
                "Prairie dogs watch from their burrows as you pass.",
                "An eagle circles high overhead.",
                "A family of deer stands at the treeline.",
                "Coyotes howl in the distance as night falls.",
                "A jackrabbit bolts across the trail.",
                "Buffalo graze on the distant plains.",
            ],
            rng,
        ),
        PassiveEventId::SnakeScare => {
            health_delta = -3.0;
            pick_line(
                &[
                    "A rattlesnake on the trail! Everyone freezes until it slides away.",
                    "You nearly step on a snake and back away slowly.",
                    "A snake spooks the oxen. It takes a while to calm them.",
                ],
                rng,
            )
        }
        PassiveEventId::ScenicVista => pick_line(
            &[
                "The view from this ridge is breathtaking.",
                "You crest a hill and the plains stretch on without end.",
                "The sunset paints the sky orange and purple.",
                "More stars tonight than anyone has ever seen.",
                "Morning fog lifts to reveal a green valley.",
            ],
            rng,
        ),
        PassiveEventId::CreekFord => pick_line(
            &[
                "You ford a small creek without trouble.",
                "A shallow stream. The oxen barely wet their hooves.",
                "An easy creek crossing breaks up the monotony.",
            ],
            rng,
        ),
    };

    if health_delta.abs() > f64::EPSILON {
        narrate_shift(&mut text, state.apply_health(health_delta));
    }
    text
}
