//! Cumulative signal-retention table
//!
//! `ALPHAS_CUMPROD[t]` is the fraction of the clean signal left after `t + 1`
//! forward noising steps of the SD 1.x scaled-linear beta schedule
//! (betas linear in sqrt space from 0.00085 to 0.012 over 1000 steps).

/// Number of raw timesteps covered by [`ALPHAS_CUMPROD`]
pub const NUM_TRAIN_TIMESTEPS: usize = 1000;

/// Cumulative product of `1 - beta` per raw timestep
#[rustfmt::skip]
pub const ALPHAS_CUMPROD: [f64; NUM_TRAIN_TIMESTEPS] = [
    0.999150000000, 0.998296027838, 0.997438081988, 0.996576161011, 0.995710263563,
    0.994840388389, 0.993966534324, 0.993088700298, 0.992206885331, 0.991321088535,
    0.990431309114, 0.989537546367, 0.988639799684, 0.987738068548, 0.986832352537,
    0.985922651320, 0.985008964661, 0.984091292421, 0.983169634550, 0.982243991096,
    0.981314362201, 0.980380748101, 0.979443149130, 0.978501565714, 0.977555998376,
    0.976606447735, 0.975652914506, 0.974695399500, 0.973733903623, 0.972768427881,
    0.971798973375, 0.970825541301, 0.969848132954, 0.968866749728, 0.967881393112,
    0.966892064694, 0.965898766160, 0.964901499292, 0.963900265973, 0.962895068183,
    0.961885908001, 0.960872787605, 0.959855709272, 0.958834675376, 0.957809688394,
    0.956780750898, 0.955747865564, 0.954711035164, 0.953670262571, 0.952625550760,
    0.951576902802, 0.950524321873, 0.949467811245, 0.948407374293, 0.947343014492,
    0.946274735417, 0.945202540746, 0.944126434255, 0.943046419822, 0.941962501429,
    0.940874683154, 0.939782969181, 0.938687363794, 0.937587871377, 0.936484496417,
    0.935377243504, 0.934266117326, 0.933151122678, 0.932032264452, 0.930909547645,
    0.929782977356, 0.928652558785, 0.927518297234, 0.926380198109, 0.925238266917,
    0.924092509268, 0.922942930873, 0.921789537548, 0.920632335209, 0.919471329876,
    0.918306527671, 0.917137934820, 0.915965557649, 0.914789402588, 0.913609476170,
    0.912425785031, 0.911238335909, 0.910047135644, 0.908852191179, 0.907653509562,
    0.906451097940, 0.905244963565, 0.904035113792, 0.902821556076, 0.901604297977,
    0.900383347157, 0.899158711381, 0.897930398515, 0.896698416529, 0.895462773495,
    0.894223477587, 0.892980537081, 0.891733960356, 0.890483755894, 0.889229932277,
    0.887972498191, 0.886711462424, 0.885446833864, 0.884178621503, 0.882906834434,
    0.881631481851, 0.880352573050, 0.879070117430, 0.877784124489, 0.876494603827,
    0.875201565148, 0.873905018252, 0.872604973044, 0.871301439529, 0.869994427811,
    0.868683948097, 0.867370010692, 0.866052626004, 0.864731804538, 0.863407556903,
    0.862079893804, 0.860748826048, 0.859414364541, 0.858076520288, 0.856735304394,
    0.855390728063, 0.854042802596, 0.852691539396, 0.851336949962, 0.849979045891,
    0.848617838881, 0.847253340725, 0.845885563316, 0.844514518642, 0.843140218790,
    0.841762675944, 0.840381902385, 0.838997910489, 0.837610712732, 0.836220321682,
    0.834826750005, 0.833430010464, 0.832030115914, 0.830627079309, 0.829220913695,
    0.827811632214, 0.826399248104, 0.824983774693, 0.823565225407, 0.822143613763,
    0.820718953374, 0.819291257942, 0.817860541266, 0.816426817234, 0.814990099830,
    0.813550403125, 0.812107741286, 0.810662128569, 0.809213579321, 0.807762107980,
    0.806307729074, 0.804850457221, 0.803390307129, 0.801927293596, 0.800461431506,
    0.798992735835, 0.797521221646, 0.796046904088, 0.794569798400, 0.793089919908,
    0.791607284023, 0.790121906244, 0.788633802156, 0.787142987428, 0.785649477816,
    0.784153289161, 0.782654437386, 0.781152938502, 0.779648808600, 0.778142063857,
    0.776632720530, 0.775120794962, 0.773606303575, 0.772089262874, 0.770569689445,
    0.769047599954, 0.767523011149, 0.765995939856, 0.764466402981, 0.762934417510,
    0.761400000506, 0.759863169111, 0.758323940544, 0.756782332102, 0.755238361158,
    0.753692045161, 0.752143401636, 0.750592448182, 0.749039202477, 0.747483682267,
    0.745925905376, 0.744365889701, 0.742803653210, 0.741239213945, 0.739672590017,
    0.738103799612, 0.736532860985, 0.734959792459, 0.733384612431, 0.731807339363,
    0.730227991788, 0.728646588306, 0.727063147585, 0.725477688361, 0.723890229434,
    0.722300789671, 0.720709388006, 0.719116043435, 0.717520775020, 0.715923601886,
    0.714324543220, 0.712723618274, 0.711120846360, 0.709516246851, 0.707909839183,
    0.706301642849, 0.704691677405, 0.703079962463, 0.701466517694, 0.699851362829,
    0.698234517653, 0.696616002009, 0.694995835797, 0.693374038971, 0.691750631539,
    0.690125633564, 0.688499065164, 0.686870946506, 0.685241297813, 0.683610139358,
    0.681977491464, 0.680343374505, 0.678707808906, 0.677070815139, 0.675432413725,
    0.673792625233, 0.672151470279, 0.670508969525, 0.668865143679, 0.667220013493,
    0.665573599765, 0.663925923336, 0.662277005089, 0.660626865952, 0.658975526891,
    0.657323008916, 0.655669333076, 0.654014520460, 0.652358592195, 0.650701569448,
    0.649043473422, 0.647384325358, 0.645724146531, 0.644062958253, 0.642400781872,
    0.640737638768, 0.639073550354, 0.637408538078, 0.635742623418, 0.634075827882,
    0.632408173012, 0.630739680377, 0.629070371576, 0.627400268236, 0.625729392010,
    0.624057764582, 0.622385407657, 0.620712342970, 0.619038592277, 0.617364177360,
    0.615689120023, 0.614013442093, 0.612337165419, 0.610660311869, 0.608982903335,
    0.607304961724, 0.605626508965, 0.603947567003, 0.602268157801, 0.600588303338,
    0.598908025609, 0.597227346624, 0.595546288407, 0.593864872996, 0.592183122439,
    0.590501058800, 0.588818704150, 0.587136080574, 0.585453210164, 0.583770115022,
    0.582086817257, 0.580403338986, 0.578719702334, 0.577035929429, 0.575352042405,
    0.573668063401, 0.571984014558, 0.570299918021, 0.568615795937, 0.566931670452,
    0.565247563713, 0.563563497870, 0.561879495066, 0.560195577447, 0.558511767154,
    0.556828086323, 0.555144557089, 0.553461201578, 0.551778041915, 0.550095100213,
    0.548412398582, 0.546729959120, 0.545047803919, 0.543365955059, 0.541684434611,
    0.540003264634, 0.538322467174, 0.536642064265, 0.534962077928, 0.533282530169,
    0.531603442976, 0.529924838325, 0.528246738174, 0.526569164462, 0.524892139110,
    0.523215684021, 0.521539821078, 0.519864572141, 0.518189959051, 0.516516003626,
    0.514842727661, 0.513170152926, 0.511498301168, 0.509827194109, 0.508156853441,
    0.506487300835, 0.504818557930, 0.503150646337, 0.501483587639, 0.499817403389,
    0.498152115109, 0.496487744289, 0.494824312387, 0.493161840827, 0.491500351002,
    0.489839864267, 0.488180401943, 0.486521985317, 0.484864635635, 0.483208374110,
    0.481553221913, 0.479899200177, 0.478246329996, 0.476594632423, 0.474944128470,
    0.473294839104, 0.471646785254, 0.469999987802, 0.468354467587, 0.466710245402,
    0.465067341995, 0.463425778068, 0.461785574275, 0.460146751222, 0.458509329466,
    0.456873329515, 0.455238771828, 0.453605676810, 0.451974064819, 0.450343956156,
    0.448715371073, 0.447088329764, 0.445462852373, 0.443838958987, 0.442216669636,
    0.440596004295, 0.438976982881, 0.437359625254, 0.435743951214, 0.434129980504,
    0.432517732804, 0.430907227735, 0.429298484858, 0.427691523668, 0.426086363602,
    0.424483024031, 0.422881524262, 0.421281883537, 0.419684121035, 0.418088255866,
    0.416494307076, 0.414902293641, 0.413312234471, 0.411724148407, 0.410138054220,
    0.408553970613, 0.406971916215, 0.405391909587, 0.403813969218, 0.402238113522,
    0.400664360844, 0.399092729451, 0.397523237539, 0.395955903227, 0.394390744561,
    0.392827779509, 0.391267025962, 0.389708501735, 0.388152224564, 0.386598212109,
    0.385046481948, 0.383497051581, 0.381949938427, 0.380405159824, 0.378862733032,
    0.377322675224, 0.375785003495, 0.374249734854, 0.372716886228, 0.371186474460,
    0.369658516307, 0.368133028443, 0.366610027455, 0.365089529844, 0.363571552023,
    0.362056110321, 0.360543220977, 0.359032900141, 0.357525163875, 0.356020028154,
    0.354517508860, 0.353017621786, 0.351520382635, 0.350025807018, 0.348533910454,
    0.347044708371, 0.345558216103, 0.344074448892, 0.342593421886, 0.341115150140,
    0.339639648612, 0.338166932168, 0.336697015577, 0.335229913513, 0.333765640554,
    0.332304211180, 0.330845639776, 0.329389940628, 0.327937127926, 0.326487215758,
    0.325040218119, 0.323596148900, 0.322155021895, 0.320716850797, 0.319281649202,
    0.317849430600, 0.316420208386, 0.314993995850, 0.313570806181, 0.312150652467,
    0.310733547692, 0.309319504741, 0.307908536391, 0.306500655320, 0.305095874100,
    0.303694205201, 0.302295660986, 0.300900253716, 0.299507995546, 0.298118898526,
    0.296732974601, 0.295350235610, 0.293970693286, 0.292594359256, 0.291221245040,
    0.289851362051, 0.288484721597, 0.287121334876, 0.285761212979, 0.284404366892,
    0.283050807490, 0.281700545540, 0.280353591702, 0.279009956527, 0.277669650456,
    0.276332683823, 0.274999066850, 0.273668809652, 0.272341922233, 0.271018414487,
    0.269698296200, 0.268381577045, 0.267068266587, 0.265758374279, 0.264451909464,
    0.263148881374, 0.261849299131, 0.260553171744, 0.259260508113, 0.257971317025,
    0.256685607156, 0.255403387071, 0.254124665224, 0.252849449954, 0.251577749492,
    0.250309571955, 0.249044925349, 0.247783817566, 0.246526256388, 0.245272249484,
    0.244021804411, 0.242774928612, 0.241531629420, 0.240291914054, 0.239055789620,
    0.237823263114, 0.236594341418, 0.235369031300, 0.234147339417, 0.232929272314,
    0.231714836422, 0.230504038060, 0.229296883434, 0.228093378639, 0.226893529656,
    0.225697342353, 0.224504822487, 0.223315975702, 0.222130807530, 0.220949323388,
    0.219771528586, 0.218597428315, 0.217427027661, 0.216260331591, 0.215097344966,
    0.213938072531, 0.212782518920, 0.211630688657, 0.210482586152, 0.209338215706,
    0.208197581504, 0.207060687626, 0.205927538035, 0.204798136586, 0.203672487023,
    0.202550592978, 0.201432457973, 0.200318085420, 0.199207478618, 0.198100640759,
    0.196997574924, 0.195898284082, 0.194802771096, 0.193711038716, 0.192623089585,
    0.191538926235, 0.190458551091, 0.189381966466, 0.188309174569, 0.187240177497,
    0.186174977240, 0.185113575680, 0.184055974591, 0.183002175641, 0.181952180389,
    0.180905990288, 0.179863606683, 0.178825030814, 0.177790263815, 0.176759306711,
    0.175732160425, 0.174708825773, 0.173689303465, 0.172673594106, 0.171661698200,
    0.170653616141, 0.169649348223, 0.168648894636, 0.167652255464, 0.166659430691,
    0.165670420195, 0.164685223755, 0.163703841044, 0.162726271637, 0.161752515005,
    0.160782570518, 0.159816437446, 0.158854114957, 0.157895602121, 0.156940897907,
    0.155990001184, 0.155042910722, 0.154099625194, 0.153160143172, 0.152224463132,
    0.151292583452, 0.150364502412, 0.149440218195, 0.148519728889, 0.147603032485,
    0.146690126878, 0.145781009868, 0.144875679161, 0.143974132366, 0.143076367002,
    0.142182380489, 0.141292170159, 0.140405733249, 0.139523066902, 0.138644168172,
    0.137769034019, 0.136897661314, 0.136030046836, 0.135166187274, 0.134306079227,
    0.133449719206, 0.132597103632, 0.131748228838, 0.130903091068, 0.130061686481,
    0.129224011146, 0.128390061048, 0.127559832085, 0.126733320068, 0.125910520725,
    0.125091429699, 0.124276042547, 0.123464354746, 0.122656361686, 0.121852058676,
    0.121051440944, 0.120254503634, 0.119461241810, 0.118671650456, 0.117885724475,
    0.117103458690, 0.116324847845, 0.115549886607, 0.114778569563, 0.114010891223,
    0.113246846019, 0.112486428309, 0.111729632373, 0.110976452416, 0.110226882567,
    0.109480916882, 0.108738549343, 0.107999773859, 0.107264584264, 0.106532974322,
    0.105804937724, 0.105080468091, 0.104359558972, 0.103642203846, 0.102928396125,
    0.102218129149, 0.101511396190, 0.100808190453, 0.100108505076, 0.099412333129,
    0.098719667616, 0.098030501477, 0.097344827585, 0.096662638749, 0.095983927714,
    0.095308687163, 0.094636909714, 0.093968587924, 0.093303714288, 0.092642281240,
    0.091984281153, 0.091329706341, 0.090678549059, 0.090030801500, 0.089386455803,
    0.088745504046, 0.088107938253, 0.087473750388, 0.086842932361, 0.086215476028,
    0.085591373188, 0.084970615586, 0.084353194914, 0.083739102812, 0.083128330866,
    0.082520870610, 0.081916713529, 0.081315851054, 0.080718274569, 0.080123975407,
    0.079532944851, 0.078945174138, 0.078360654456, 0.077779376946, 0.077201332702,
    0.076626512773, 0.076054908161, 0.075486509825, 0.074921308679, 0.074359295593,
    0.073800461394, 0.073244796868, 0.072692292756, 0.072142939760, 0.071596728542,
    0.071053649722, 0.070513693881, 0.069976851561, 0.069443113266, 0.068912469461,
    0.068384910577, 0.067860427004, 0.067339009099, 0.066820647183, 0.066305331540,
    0.065793052423, 0.065283800049, 0.064777564602, 0.064274336235, 0.063774105066,
    0.063276861185, 0.062782594649, 0.062291295485, 0.061802953691, 0.061317559235,
    0.060835102057, 0.060355572068, 0.059878959153, 0.059405253169, 0.058934443948,
    0.058466521295, 0.058001474990, 0.057539294788, 0.057079970422, 0.056623491598,
    0.056169848003, 0.055719029298, 0.055271025125, 0.054825825103, 0.054383418831,
    0.053943795888, 0.053506945832, 0.053072858203, 0.052641522523, 0.052212928294,
    0.051787065004, 0.051363922120, 0.050943489095, 0.050525755366, 0.050110710354,
    0.049698343466, 0.049288644094, 0.048881601617, 0.048477205400, 0.048075444796,
    0.047676309145, 0.047279787776, 0.046885870008, 0.046494545147, 0.046105802490,
    0.045719631325, 0.045336020930, 0.044954960576, 0.044576439524, 0.044200447029,
    0.043826972337, 0.043456004690, 0.043087533323, 0.042721547463, 0.042358036336,
    0.041996989161, 0.041638395153, 0.041282243525, 0.040928523483, 0.040577224236,
    0.040228334986, 0.039881844936, 0.039537743286, 0.039196019237, 0.038856661989,
    0.038519660741, 0.038185004694, 0.037852683051, 0.037522685014, 0.037194999789,
    0.036869616583, 0.036546524608, 0.036225713077, 0.035907171208, 0.035590888223,
    0.035276853350, 0.034965055819, 0.034655484869, 0.034348129742, 0.034042979689,
    0.033740023966, 0.033439251836, 0.033140652572, 0.032844215452, 0.032549929766,
    0.032257784809, 0.031967769887, 0.031679874318, 0.031394087426, 0.031110398548,
    0.030828797032, 0.030549272236, 0.030271813531, 0.029996410298, 0.029723051933,
    0.029451727842, 0.029182427448, 0.028915140184, 0.028649855499, 0.028386562854,
    0.028125251728, 0.027865911612, 0.027608532014, 0.027353102457, 0.027099612481,
    0.026848051642, 0.026598409512, 0.026350675681, 0.026104839756, 0.025860891362,
    0.025618820143, 0.025378615759, 0.025140267891, 0.024903766238, 0.024669100520,
    0.024436260475, 0.024205235860, 0.023976016457, 0.023748592063, 0.023522952500,
    0.023299087610, 0.023076987256, 0.022856641323, 0.022638039718, 0.022421172372,
    0.022206029238, 0.021992600290, 0.021780875528, 0.021570844974, 0.021362498675,
    0.021155826701, 0.020950819146, 0.020747466131, 0.020545757799, 0.020345684319,
    0.020147235887, 0.019950402723, 0.019755175073, 0.019561543211, 0.019369497433,
    0.019179028067, 0.018990125464, 0.018802780004, 0.018616982093, 0.018432722166,
    0.018249990684, 0.018068778137, 0.017889075044, 0.017710871951, 0.017534159433,
    0.017358928093, 0.017185168565, 0.017012871511, 0.016842027622, 0.016672627619,
    0.016504662253, 0.016338122305, 0.016172998585, 0.016009281936, 0.015846963228,
    0.015686033365, 0.015526483279, 0.015368303934, 0.015211486328, 0.015056021485,
    0.014901900465, 0.014749114357, 0.014597654284, 0.014447511399, 0.014298676888,
    0.014151141970, 0.014004897894, 0.013859935944, 0.013716247436, 0.013573823718,
    0.013432656172, 0.013292736212, 0.013154055286, 0.013016604876, 0.012880376494,
    0.012745361690, 0.012611552046, 0.012478939175, 0.012347514729, 0.012217270389,
    0.012088197873, 0.011960288933, 0.011833535354, 0.011707928957, 0.011583461595,
    0.011460125158, 0.011337911569, 0.011216812786, 0.011096820803, 0.010977927648,
    0.010860125383, 0.010743406106, 0.010627761950, 0.010513185083, 0.010399667708,
    0.010287202063, 0.010175780422, 0.010065395095, 0.009956038426, 0.009847702793,
    0.009740380614, 0.009634064339, 0.009528746455, 0.009424419483, 0.009321075982,
    0.009218708545, 0.009117309802, 0.009016872417, 0.008917389092, 0.008818852563,
    0.008721255603, 0.008624591019, 0.008528851658, 0.008434030398, 0.008340120155,
    0.008247113882, 0.008155004567, 0.008063785234, 0.007973448942, 0.007883988787,
    0.007795397902, 0.007707669452, 0.007620796644, 0.007534772715, 0.007449590941,
    0.007365244634, 0.007281727141, 0.007199031845, 0.007117152166, 0.007036081558,
    0.006955813512, 0.006876341554, 0.006797659248, 0.006719760190, 0.006642638015,
    0.006566286393, 0.006490699029, 0.006415869663, 0.006341792072, 0.006268460069,
    0.006195867500, 0.006124008248, 0.006052876233, 0.005982465407, 0.005912769761,
    0.005843783319, 0.005775500139, 0.005707914319, 0.005641019986, 0.005574811307,
    0.005509282482, 0.005444427746, 0.005380241369, 0.005316717655, 0.005253850945,
    0.005191635614, 0.005130066069, 0.005069136755, 0.005008842150, 0.004949176766,
    0.004890135151, 0.004831711885, 0.004773901585, 0.004716698900, 0.004660098513,
];
