//! Robot descriptions used across the test suites.

/// Serial arm: `base -shoulder-> upper_arm -elbow-> forearm -slide-> wrist
/// -tool_mount(fixed)-> tool`.
pub const SERIAL_ARM: &str = r#"
<robot name="arm">
    <link name="base"/>
    <link name="upper_arm"/>
    <link name="forearm"/>
    <link name="wrist"/>
    <link name="tool"/>
    <joint name="shoulder" type="revolute">
        <parent link="base"/>
        <child link="upper_arm"/>
        <origin xyz="0 0 0.1" rpy="0 0 0"/>
        <axis xyz="0 0 1"/>
        <limit lower="-3.14" upper="3.14" effort="50" velocity="2"/>
    </joint>
    <joint name="elbow" type="revolute">
        <parent link="upper_arm"/>
        <child link="forearm"/>
        <origin xyz="0 0 0.4" rpy="0 0 0"/>
        <axis xyz="0 1 0"/>
        <limit lower="-2.0" upper="2.0" effort="30" velocity="2"/>
    </joint>
    <joint name="slide" type="prismatic">
        <parent link="forearm"/>
        <child link="wrist"/>
        <origin xyz="0 0 0.3" rpy="0 0 0"/>
        <axis xyz="0 0 1"/>
        <limit lower="0.0" upper="0.2" effort="10" velocity="0.5"/>
    </joint>
    <joint name="tool_mount" type="fixed">
        <parent link="wrist"/>
        <child link="tool"/>
        <origin xyz="0 0 0.05" rpy="0 0 0"/>
    </joint>
</robot>
"#;

/// Torso with two arms; the waist is continuous and the left hand is fixed.
///
/// Regular numbering: `waist` 1, `l_shoulder` 2, `l_grip` 3, `r_shoulder` 4.
pub const BRANCHED: &str = r#"
<robot name="twoarms">
    <link name="base"/>
    <link name="torso"/>
    <link name="l_arm"/>
    <link name="l_hand"/>
    <link name="r_arm"/>
    <joint name="waist" type="continuous">
        <parent link="base"/>
        <child link="torso"/>
        <axis xyz="0 0 1"/>
    </joint>
    <joint name="l_shoulder" type="revolute">
        <parent link="torso"/>
        <child link="l_arm"/>
        <origin xyz="0 0.2 0.5" rpy="0 0 0"/>
        <axis xyz="0 1 0"/>
        <limit lower="-1.57" upper="1.57" effort="20" velocity="1"/>
    </joint>
    <joint name="l_grip" type="fixed">
        <parent link="l_arm"/>
        <child link="l_hand"/>
        <origin xyz="0 0 -0.3" rpy="0 0 0"/>
    </joint>
    <joint name="r_shoulder" type="revolute">
        <parent link="torso"/>
        <child link="r_arm"/>
        <origin xyz="0 -0.2 0.5" rpy="0 0 0"/>
        <axis xyz="0 1 0"/>
        <limit lower="-1.57" upper="1.57" effort="20" velocity="1"/>
    </joint>
</robot>
"#;

/// Gantry whose table moves on a planar joint, which no solver supports.
pub const PLANAR: &str = r#"
<robot name="gantry">
    <link name="base"/>
    <link name="carriage"/>
    <link name="plate"/>
    <joint name="rail" type="prismatic">
        <parent link="base"/>
        <child link="carriage"/>
        <axis xyz="1 0 0"/>
        <limit lower="0" upper="1" effort="10" velocity="1"/>
    </joint>
    <joint name="table" type="planar">
        <parent link="carriage"/>
        <child link="plate"/>
        <axis xyz="0 0 1"/>
    </joint>
</robot>
"#;
