use crate::{
    ConfirmSpec, CourseSpec, GateOption, KnockdownSpec, PedestalOption, PropSpec, Shape, SolidSpec,
    Vec3f, VolumeSpec, ZoneKind, ZoneSpan, ZoneSpec,
};

// Survey drive laid out along -Z between two side walls at x = ±30.
pub fn survey_course() -> CourseSpec {
    CourseSpec {
        spawn: Vec3f::new(0.0, 1.0, 0.0),
        walls: boundary_walls(),
        zones: vec![
            intro(),
            source_tracking(),
            play_style(),
            play_frequency(),
            play_partners(),
            games_owned(),
            location(),
            age(),
            vibe_check(),
            feedback_booth(),
        ],
    }
}

fn boundary_walls() -> Vec<SolidSpec> {
    let side = Shape::cuboid(1.0, 10.0, 720.0);
    let end = Shape::cuboid(60.0, 10.0, 1.0);
    vec![
        solid("wall:left", Vec3f::new(-30.0, 5.0, -340.0), side),
        solid("wall:right", Vec3f::new(30.0, 5.0, -340.0), side),
        solid("wall:back", Vec3f::new(0.0, 5.0, 10.0), end),
        solid("wall:front", Vec3f::new(0.0, 5.0, -695.0), end),
    ]
}

fn intro() -> ZoneSpec {
    // Two pairs of topple characters flank the play button
    let decorations = [(-2.5, -8.0), (2.5, -8.0), (-2.5, -12.0), (2.5, -12.0)]
        .into_iter()
        .map(|(x, z)| KnockdownSpec {
            volume: VolumeSpec::new(Vec3f::new(x, 1.5, z), Shape::cylinder(0.9, 3.0)),
            target: PropSpec {
                volume: VolumeSpec::new(Vec3f::new(x, 1.5, z), Shape::cuboid(1.0, 3.0, 1.0)),
                mass: 50.0,
                linear_damping: 0.4,
                angular_damping: 0.4,
                impulse_point: Vec3f::new(0.0, 1.2, 0.0),
            },
        })
        .collect();

    ZoneSpec {
        id: "intro".into(),
        title: "Welcome".into(),
        span: ZoneSpan::new(-42.0, 10.0),
        completion_delay: 0.0,
        kind: ZoneKind::Intro {
            play_button: VolumeSpec::new(Vec3f::new(0.0, 0.15, -14.0), Shape::cuboid(3.0, 0.5, 3.0)),
            start_gate: VolumeSpec::new(Vec3f::new(0.0, 0.0, -35.0), Shape::cuboid(6.0, 8.0, 2.0)),
            decorations,
        },
        solids: Vec::new(),
    }
}

fn source_tracking() -> ZoneSpec {
    let portals = [
        ("social", "Social media"),
        ("qrcode", "QR code"),
        ("convention", "Convention"),
        ("friend", "A friend"),
        ("unknown", "Not sure"),
    ];
    let options = portals
        .iter()
        .enumerate()
        .map(|(i, (id, label))| {
            let x = -16.0 + 8.0 * i as f32;
            gate(id, label, Vec3f::new(x, 2.0, -50.0), Shape::cylinder(2.5, 4.0))
        })
        .collect();
    single_choice("source", "How did you hear about us?", ZoneSpan::new(-65.0, -42.0), 2.0, options)
}

fn play_style() -> ZoneSpec {
    let islands = [
        ("competitive", "Competitive"),
        ("team", "Team play"),
        ("story", "Story"),
        ("fun", "Just for fun"),
    ];
    let mut options = Vec::new();
    let mut ramps = Vec::new();
    for (i, (id, label)) in islands.iter().enumerate() {
        let x = -12.0 + 8.0 * i as f32;
        options.push(gate(id, label, Vec3f::new(x, 0.0, -150.0), Shape::cylinder(2.0, 6.0)));
        // Ramp deck sits above the chassis; presentation only
        ramps.push(solid(
            &format!("ramp:{id}"),
            Vec3f::new(x, 1.5, -151.5),
            Shape::cuboid(3.0, 0.15, 5.0),
        ));
    }
    let mut zone = single_choice("play_style", "How do you like to play?", ZoneSpan::new(-165.0, -135.0), 1.5, options);
    zone.solids = ramps;
    zone
}

fn play_frequency() -> ZoneSpec {
    let lanes = [
        ("hardcore", "Every day"),
        ("weekly", "Weekly"),
        ("monthly-few", "A few times a month"),
        ("monthly", "Monthly"),
        ("wishful", "I wish I played more"),
    ];
    let lane_width = 4.0;
    let lane_length = 60.0;
    let z = -275.0;
    let mut options = Vec::new();
    let mut dividers = Vec::new();
    for (i, (id, label)) in lanes.iter().enumerate() {
        let x = -10.0 + 5.0 * i as f32;
        options.push(gate(id, label, Vec3f::new(x, 0.0, z), Shape::cuboid(lane_width, 3.0, lane_length)));
        for side in [-1.0, 1.0] {
            dividers.push(solid(
                &format!("lane:{id}:{side}"),
                Vec3f::new(x + side * lane_width * 0.5, 0.5, z),
                Shape::cuboid(0.2, 1.0, lane_length),
            ));
        }
    }
    let mut zone = single_choice("frequency", "How often do you play?", ZoneSpan::new(-312.0, -240.0), 1.5, options);
    zone.solids = dividers;
    zone
}

fn play_partners() -> ZoneSpec {
    let characters = [
        ("family", "Family", -10.0, -370.0),
        ("friends", "Friends", -6.0, -365.0),
        ("gaming-group", "Gaming group", -2.0, -362.0),
        ("partner", "Partner", 2.0, -362.0),
        ("online", "Online", 6.0, -365.0),
        ("solo", "Solo", 10.0, -370.0),
    ];
    let options = characters
        .iter()
        .map(|&(id, label, x, z)| PedestalOption {
            id: id.into(),
            label: label.into(),
            knockdown: KnockdownSpec {
                volume: VolumeSpec::new(Vec3f::new(x, 1.0, z), Shape::cylinder(2.0, 3.0)),
                target: PropSpec {
                    volume: VolumeSpec::new(Vec3f::new(x, 2.0, z), Shape::cuboid(1.5, 3.0, 0.8)),
                    mass: 8.0,
                    linear_damping: 0.9,
                    angular_damping: 0.9,
                    impulse_point: Vec3f::new(0.0, 1.2, 0.0),
                },
            },
        })
        .collect();
    ZoneSpec {
        id: "partners".into(),
        title: "Who do you play with?".into(),
        span: ZoneSpan::new(-398.0, -352.0),
        completion_delay: 1.5,
        kind: ZoneKind::MultiSelect {
            options,
            continue_gate: VolumeSpec::new(Vec3f::new(0.0, 1.5, -390.0), Shape::cylinder(3.0, 4.0)),
            confirm: ConfirmSpec::Tilt,
        },
        solids: Vec::new(),
    }
}

fn games_owned() -> ZoneSpec {
    let games = [
        ("shipping-empire", "Shipping Empire"),
        ("rivals-fairyland", "Rivals of Fairyland"),
        ("mission-mars", "Mission Mars"),
    ];
    let options = games
        .iter()
        .enumerate()
        .map(|(i, (id, label))| {
            let x = -8.0 + 8.0 * i as f32;
            PedestalOption {
                id: id.to_string(),
                label: label.to_string(),
                knockdown: KnockdownSpec {
                    volume: VolumeSpec::new(Vec3f::new(x, 1.0, -455.0), Shape::cylinder(2.0, 3.0)),
                    target: PropSpec {
                        volume: VolumeSpec::new(Vec3f::new(x, 2.5, -455.0), Shape::cuboid(2.0, 2.0, 2.0)),
                        mass: 8.0,
                        linear_damping: 0.9,
                        angular_damping: 0.9,
                        impulse_point: Vec3f::new(0.0, 1.0, 0.0),
                    },
                },
            }
        })
        .collect();
    ZoneSpec {
        id: "games".into(),
        title: "Which of our games do you own?".into(),
        span: ZoneSpan::new(-482.0, -438.0),
        completion_delay: 1.5,
        kind: ZoneKind::MultiSelect {
            options,
            continue_gate: VolumeSpec::new(Vec3f::new(0.0, 1.5, -475.0), Shape::cylinder(3.0, 4.0)),
            confirm: ConfirmSpec::Delay,
        },
        solids: Vec::new(),
    }
}

fn location() -> ZoneSpec {
    let regions = [
        ("usa", "USA", -12.0, -530.0),
        ("canada", "Canada", -12.0, -545.0),
        ("uk", "United Kingdom", 0.0, -530.0),
        ("europe", "Europe", 0.0, -545.0),
        ("asia-pacific", "Asia Pacific", 12.0, -530.0),
        ("other", "Somewhere else", 12.0, -545.0),
    ];
    let options = regions
        .iter()
        .map(|&(id, label, x, z)| gate(id, label, Vec3f::new(x, 0.5, z), Shape::cuboid(8.0, 2.0, 11.0)))
        .collect();
    single_choice("location", "Where are you from?", ZoneSpan::new(-556.0, -518.0), 1.5, options)
}

fn age() -> ZoneSpec {
    let brackets = [
        ("under-18", "Under 18"),
        ("18-24", "18-24"),
        ("25-34", "25-34"),
        ("35-44", "35-44"),
        ("45-54", "45-54"),
        ("55-plus", "55+"),
    ];
    let options = brackets
        .iter()
        .enumerate()
        .map(|(i, (id, label))| {
            let x = -15.0 + 6.0 * i as f32;
            gate(id, label, Vec3f::new(x, 2.5, -605.0), Shape::cylinder(3.0, 5.0))
        })
        .collect();
    single_choice("age", "How old are you?", ZoneSpan::new(-618.0, -592.0), 1.5, options)
}

fn vibe_check() -> ZoneSpec {
    let options = vec![
        gate("yes", "Yes", Vec3f::new(-3.0, 2.0, -638.0), Shape::cuboid(3.0, 4.0, 1.0)),
        gate("no", "No", Vec3f::new(3.0, 2.0, -638.0), Shape::cuboid(3.0, 4.0, 1.0)),
    ];
    single_choice("vibe", "Enjoying the drive?", ZoneSpan::new(-648.0, -628.0), 1.5, options)
}

fn feedback_booth() -> ZoneSpec {
    ZoneSpec {
        id: "feedback".into(),
        title: "Anything else to tell us?".into(),
        span: ZoneSpan::new(-680.0, -655.0),
        completion_delay: 1.5,
        kind: ZoneKind::FreeText {
            booth: VolumeSpec::new(Vec3f::new(0.0, 2.0, -668.0), Shape::cuboid(6.0, 4.0, 6.0)),
        },
        solids: Vec::new(),
    }
}

fn single_choice(id: &str, title: &str, span: ZoneSpan, delay: f32, options: Vec<GateOption>) -> ZoneSpec {
    ZoneSpec {
        id: id.into(),
        title: title.into(),
        span,
        completion_delay: delay,
        kind: ZoneKind::SingleChoice { options },
        solids: Vec::new(),
    }
}

fn gate(id: &str, label: &str, position: Vec3f, shape: Shape) -> GateOption {
    GateOption {
        id: id.into(),
        label: label.into(),
        volume: VolumeSpec::new(position, shape),
    }
}

fn solid(name: &str, position: Vec3f, shape: Shape) -> SolidSpec {
    SolidSpec {
        name: name.into(),
        volume: VolumeSpec::new(position, shape),
    }
}
